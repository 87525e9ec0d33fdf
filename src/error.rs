//! Error types for session management and board validation.
//!
//! Every failure here is recoverable at the request boundary; handlers map
//! these into HTTP statuses and the process keeps serving other matches.

use thiserror::Error;

/// A request payload the classifier must never see.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board dimensions {width}x{height} are invalid")]
    BadDimensions { width: i32, height: i32 },

    #[error("snake '{id}' has an empty body")]
    EmptyBody { id: String },

    #[error("snake '{id}' segment ({x}, {y}) is outside the {width}x{height} board")]
    SegmentOutOfBounds { id: String, x: i32, y: i32, width: i32, height: i32 },

    #[error("food at ({x}, {y}) is outside the {width}x{height} board")]
    FoodOutOfBounds { x: i32, y: i32, width: i32, height: i32 },
}

/// Session lifecycle failures keyed by match id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("game '{0}' already has an active session")]
    AlreadyExists(String),

    #[error("no active session for game '{0}'")]
    NotFound(String),

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}
