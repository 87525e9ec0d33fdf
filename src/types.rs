// Battlesnake API Types
// See https://docs.battlesnake.com/api

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::Add;

use crate::error::BoardError;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    pub ruleset: HashMap<String, Value>,
    pub timeout: u32,
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Battlesnake {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    pub latency: String,
    pub shout: Option<String>,
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Coord {
        Coord { x: self.x + other.x, y: self.y + other.y }
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions in tie-break order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Unit vector for this direction (y grows upward)
    pub fn unit(&self) -> Coord {
        match self {
            Direction::Up => Coord { x: 0, y: 1 },
            Direction::Down => Coord { x: 0, y: -1 },
            Direction::Left => Coord { x: -1, y: 0 },
            Direction::Right => Coord { x: 1, y: 0 },
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        *coord + self.unit()
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameState {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

/// Rejects boards the engine cannot classify: non-positive dimensions,
/// snakes with empty bodies, or coordinates outside the playfield.
/// Runs before any grid work so bad input never reaches cell indexing.
pub fn validate_board(board: &Board, you: &Battlesnake) -> Result<(), BoardError> {
    if board.width <= 0 || board.height <= 0 {
        return Err(BoardError::BadDimensions { width: board.width, height: board.height });
    }
    let in_bounds =
        |c: &Coord| c.x >= 0 && c.x < board.width && c.y >= 0 && c.y < board.height;
    for food in &board.food {
        if !in_bounds(food) {
            return Err(BoardError::FoodOutOfBounds {
                x: food.x,
                y: food.y,
                width: board.width,
                height: board.height,
            });
        }
    }
    for snake in board.snakes.iter().chain(std::iter::once(you)) {
        if snake.body.is_empty() {
            return Err(BoardError::EmptyBody { id: snake.id.clone() });
        }
        for segment in &snake.body {
            if !in_bounds(segment) {
                return Err(BoardError::SegmentOutOfBounds {
                    id: snake.id.clone(),
                    x: segment.x,
                    y: segment.y,
                    width: board.width,
                    height: board.height,
                });
            }
        }
    }
    Ok(())
}
