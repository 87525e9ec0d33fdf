// Library exports for the snake engine
// This allows the replay tool and integration tests to use the core logic

pub mod config;
pub mod decision_log;
pub mod engine;
pub mod error;
pub mod grid;
pub mod profile;
pub mod replay;
pub mod session;
pub mod strategy;
pub mod types;
