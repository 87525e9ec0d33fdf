//! The pluggable move-selection seam.
//!
//! A strategy owns whatever per-match state it needs and answers one
//! question per turn: which way do we go. Strategies are picked by name
//! from configuration when a session is created, so a match can run the
//! full influence engine or the greedy baseline without code changes.

use crate::config::Config;
use crate::engine::InfluenceEngine;
use crate::error::{BoardError, SessionError};
use crate::types::{validate_board, Battlesnake, Board, Coord, Direction};

/// Per-match move selection capability.
///
/// `initialize` is called once at match start and may allocate; `evaluate`
/// is called every turn and returns the chosen direction. Both validate
/// their input, so a strategy can also be driven directly (replay, tests)
/// without the session layer in front of it.
pub trait Strategy: Send {
    fn initialize(&mut self, board: &Board, you: &Battlesnake) -> Result<(), BoardError>;

    fn evaluate(&mut self, board: &Board, you: &Battlesnake) -> Result<Direction, BoardError>;
}

/// Builds the strategy registered under `name`.
pub fn build(name: &str, config: &Config) -> Result<Box<dyn Strategy>, SessionError> {
    match name {
        "influence" => Ok(Box::new(InfluenceEngine::new(config))),
        "greedy" => Ok(Box::new(GreedyStrategy::new())),
        other => Err(SessionError::UnknownStrategy(other.to_string())),
    }
}

/// Baseline strategy: filter out suicidal moves, then chase the nearest
/// food. No look-ahead, no scoring surface. Useful as a replay control
/// and as a floor for comparing engine changes against.
pub struct GreedyStrategy;

impl GreedyStrategy {
    pub fn new() -> Self {
        GreedyStrategy
    }

    /// A move is legal if it stays on the board, does not reverse onto the
    /// neck, and does not collide with a snake body. Tail cells count as
    /// free since they move away this tick.
    fn legal_moves(board: &Board, you: &Battlesnake) -> Vec<Direction> {
        let head = you.body[0];
        let neck = if you.body.len() > 1 { Some(you.body[1]) } else { None };

        Direction::all()
            .iter()
            .filter(|&&dir| {
                let next = dir.apply(&head);

                if neck == Some(next) {
                    return false;
                }
                if next.x < 0 || next.x >= board.width || next.y < 0 || next.y >= board.height {
                    return false;
                }
                !Self::hits_a_body(&next, board)
            })
            .copied()
            .collect()
    }

    fn hits_a_body(at: &Coord, board: &Board) -> bool {
        for snake in &board.snakes {
            let solid = snake.body.len().saturating_sub(1);
            if snake.body[..solid].contains(at) {
                return true;
            }
        }
        false
    }

    fn manhattan_distance(a: Coord, b: Coord) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }
}

impl Strategy for GreedyStrategy {
    fn initialize(&mut self, board: &Board, you: &Battlesnake) -> Result<(), BoardError> {
        validate_board(board, you)
    }

    fn evaluate(&mut self, board: &Board, you: &Battlesnake) -> Result<Direction, BoardError> {
        validate_board(board, you)?;

        let legal = Self::legal_moves(board, you);
        let first = match legal.first() {
            Some(&dir) => dir,
            None => return Ok(Direction::Up),
        };
        if board.food.is_empty() {
            return Ok(first);
        }

        let head = you.body[0];
        let closest_food = board
            .food
            .iter()
            .min_by_key(|&&food| Self::manhattan_distance(head, food))
            .copied();
        let target = match closest_food {
            Some(food) => food,
            None => return Ok(first),
        };

        Ok(legal
            .iter()
            .min_by_key(|&&dir| Self::manhattan_distance(dir.apply(&head), target))
            .copied()
            .unwrap_or(first))
    }
}
