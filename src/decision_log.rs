// Decision logging module for asynchronous per-turn record keeping
//
// Fire-and-forget writes keep the move path fast: the handler hands the
// record to a tokio task and returns immediately. Each line of the output
// file is one JSON record, replayable offline with the replay tool.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::LogConfig;
use crate::types::{Battlesnake, Board, Direction};

/// One replayable decision: the board as we saw it and what we chose.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub game_id: String,
    pub turn: i32,
    /// Which snake in `board.snakes` was ours
    pub you_id: String,
    pub chosen_move: String,
    pub board: Board,
    pub timestamp: String,
}

/// The log file opens lazily on first write; a failed open is remembered
/// so we do not retry (and re-log the error) every turn.
enum LogFile {
    Closed,
    Open(File),
    Failed,
}

/// Shared decision logger. Cheap to clone; all clones append to the same
/// file behind one async mutex.
#[derive(Clone)]
pub struct DecisionLog {
    file: Arc<Mutex<LogFile>>,
    path: String,
    enabled: bool,
}

impl DecisionLog {
    pub fn from_config(config: &LogConfig) -> Self {
        DecisionLog {
            file: Arc::new(Mutex::new(LogFile::Closed)),
            path: config.decisions_path.clone(),
            enabled: config.decisions_enabled,
        }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        DecisionLog {
            file: Arc::new(Mutex::new(LogFile::Closed)),
            path: String::new(),
            enabled: false,
        }
    }

    /// Queues one record for writing and returns without waiting for the
    /// disk. Does nothing when logging is off, so callers need no guard.
    pub fn record(&self, game_id: &str, turn: i32, board: &Board, you: &Battlesnake, chosen: Direction) {
        if !self.enabled {
            return;
        }

        let entry = DecisionRecord {
            game_id: game_id.to_string(),
            turn,
            you_id: you.id.clone(),
            chosen_move: chosen.as_str().to_string(),
            board: board.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let file = self.file.clone();
        let path = self.path.clone();

        tokio::spawn(async move {
            Self::append(file, &path, entry).await;
        });
    }

    async fn append(file: Arc<Mutex<LogFile>>, path: &str, entry: DecisionRecord) {
        let mut guard = file.lock().await;

        if let LogFile::Closed = *guard {
            *guard = match OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
            {
                Ok(file) => {
                    log::info!("Decision logging enabled: {}", path);
                    LogFile::Open(file)
                }
                Err(e) => {
                    error!("Failed to create decision log file '{}': {}", path, e);
                    LogFile::Failed
                }
            };
        }

        if let LogFile::Open(file) = &mut *guard {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write decision log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush decision log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize decision log entry: {}", e);
                }
            }
        }
    }
}
