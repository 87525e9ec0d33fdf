//! Per-match session registry.
//!
//! One strategy instance lives for the whole match, keyed by game id.
//! The registry is owned by the server as managed state; nothing here is
//! process-global, so tests can spin up as many registries as they like.
//!
//! Locking: a read-write lock guards the id map and is held only long
//! enough to clone a handle, while each session carries its own mutex.
//! Evaluations for the same match serialize; different matches never
//! contend.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::SessionError;
use crate::strategy::{self, Strategy};
use crate::types::{Battlesnake, Board, Direction};

pub struct Session {
    strategy: Mutex<Box<dyn Strategy>>,
}

pub struct SessionRegistry {
    config: Config,
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new(config: Config) -> Self {
        SessionRegistry { config, sessions: RwLock::new(HashMap::new()) }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates a session for `id` with the configured strategy and lets it
    /// size itself for the board. Nothing is registered on failure, so a
    /// rejected create leaves no trace.
    pub fn create(&self, id: &str, board: &Board, you: &Battlesnake) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(id) {
            return Err(SessionError::AlreadyExists(id.to_string()));
        }
        let mut strategy = strategy::build(&self.config.engine.strategy, &self.config)?;
        strategy.initialize(board, you)?;
        sessions.insert(id.to_string(), Arc::new(Session { strategy: Mutex::new(strategy) }));
        info!("game {}: session started ({} active)", id, sessions.len());
        Ok(())
    }

    /// Returns the live session for `id`, if any.
    pub fn lookup(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Runs one turn on the session's strategy. The per-session lock makes
    /// same-id evaluations take turns; the map lock is already released by
    /// the time the strategy runs.
    pub fn evaluate(
        &self,
        id: &str,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<Direction, SessionError> {
        let session = self.lookup(id).ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let mut strategy = session.strategy.lock();
        let direction = strategy.evaluate(board, you)?;
        Ok(direction)
    }

    /// Drops the session for `id`. Removing an id that is not registered
    /// is fine; an in-flight evaluate on the removed session finishes on
    /// its own handle.
    pub fn remove(&self, id: &str) -> bool {
        let existed = self.sessions.write().remove(id).is_some();
        if existed {
            info!("game {}: session ended", id);
        }
        existed
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }
}
