// Offline replay of decision logs.
//
// Loads a JSONL file written by the decision logger, re-runs each recorded
// board through a freshly built strategy, and reports where today's code
// disagrees with what was actually played. The engine is deterministic, so
// on unchanged code and config the agreement is 100%; anything less points
// at a tuning or engine change since the game was recorded.

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::decision_log::DecisionRecord;
use crate::strategy;
use crate::types::{Board, Direction};

/// One logged turn, re-evaluated.
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub evaluation_time_ms: u128,
}

#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Reads every record from a JSONL log. Blank lines are tolerated;
    /// anything else that fails to parse aborts with the line number.
    pub fn load_log_file<P: AsRef<Path>>(
        &self,
        log_path: P,
    ) -> Result<Vec<DecisionRecord>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", index + 1, e))?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line).map_err(|e| {
                format!("Failed to parse JSON on line {}: {}", index + 1, e)
            })?);
        }

        info!("Loaded {} decision records", entries.len());
        Ok(entries)
    }

    /// Re-evaluates one board with a fresh strategy instance, exactly as a
    /// new session would see it. Returns the direction and the wall time.
    pub fn replay_turn(&self, board: &Board, you_id: &str) -> Result<(Direction, u128), String> {
        let you = board
            .snakes
            .iter()
            .find(|s| s.id == you_id)
            .ok_or_else(|| format!("Snake with id '{}' not found in board state", you_id))?;

        let mut strategy = strategy::build(&self.config.engine.strategy, &self.config)
            .map_err(|e| e.to_string())?;

        let started = Instant::now();
        let direction = strategy.evaluate(board, you).map_err(|e| e.to_string())?;
        Ok((direction, started.elapsed().as_millis()))
    }

    pub fn replay_entry(&self, entry: &DecisionRecord) -> Result<ReplayResult, String> {
        let original_move = Self::parse_direction(&entry.chosen_move)?;
        let (replayed_move, evaluation_time_ms) = self.replay_turn(&entry.board, &entry.you_id)?;
        let matches = original_move == replayed_move;

        if self.verbose && matches {
            info!(
                "Turn {}: match, {} ({}ms)",
                entry.turn,
                replayed_move.as_str(),
                evaluation_time_ms
            );
        } else if self.verbose {
            warn!(
                "Turn {}: MISMATCH, played {} but would now choose {} ({}ms)",
                entry.turn,
                original_move.as_str(),
                replayed_move.as_str(),
                evaluation_time_ms
            );
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move,
            matches,
            evaluation_time_ms,
        })
    }

    /// Replays every entry in order. A turn that fails to replay is logged
    /// and skipped rather than sinking the whole run.
    pub fn replay_all(&self, entries: &[DecisionRecord]) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to replay turn {}: {}", entry.turn, e),
            }
        }
        Ok(results)
    }

    /// Replays the named turns in the order given. Asking for a turn the
    /// log does not contain is an error.
    pub fn replay_turns(
        &self,
        entries: &[DecisionRecord],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::with_capacity(turn_numbers.len());
        for turn in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log file", turn))?;
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to replay turn {}: {}", turn, e),
            }
        }
        Ok(results)
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate: if total_turns > 0 {
                100.0 * matches as f64 / total_turns as f64
            } else {
                0.0
            },
        }
    }

    /// Prints the agreement summary, then one line per mismatch.
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!();
        println!("Replayed turns:  {}", stats.total_turns);
        println!("Agreed:          {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Disagreed:       {}", stats.mismatches);

        if !results.is_empty() {
            let avg: f64 = results.iter().map(|r| r.evaluation_time_ms as f64).sum::<f64>()
                / results.len() as f64;
            println!("Avg evaluation:  {:.1}ms", avg);
        }
        println!();

        for result in results.iter().filter(|r| !r.matches) {
            println!(
                "  turn {}: played {}, would now choose {} ({}ms)",
                result.turn,
                result.original_move.as_str(),
                result.replayed_move.as_str(),
                result.evaluation_time_ms
            );
        }
    }

    fn parse_direction(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}
