// HTTP handler bindings for Battlesnake API endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the session registry. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting shared state from Rocket's managed state
// - Delegating to the registry
// - Mapping session errors onto HTTP statuses

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use log::{error, info};

use crate::decision_log::DecisionLog;
use crate::error::SessionError;
use crate::session::SessionRegistry;
use crate::types::GameState;

/// GET / endpoint
/// Returns snake metadata and appearance configuration
#[get("/")]
pub fn index() -> Json<Value> {
    info!("INFO");

    Json(json!({
        "apiversion": "1",
        "author": "martinamps",
        "color": "#10B981",
        "head": "default",
        "tail": "default",
    }))
}

/// POST /start endpoint
/// Called when a game starts - registers a session for it
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(
    registry: &rocket::State<Arc<SessionRegistry>>,
    start_req: Json<GameState>,
) -> Status {
    match registry.create(&start_req.game.id, &start_req.board, &start_req.you) {
        Ok(()) => Status::Ok,
        Err(e) => {
            error!("game {}: start rejected: {}", start_req.game.id, e);
            status_for(&e)
        }
    }
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    registry: &rocket::State<Arc<SessionRegistry>>,
    decision_log: &rocket::State<DecisionLog>,
    move_req: Json<GameState>,
) -> Result<Json<Value>, Status> {
    let start_time = Instant::now();
    let state = move_req.into_inner();

    // Grid evaluation is CPU-bound; keep it off the async workers
    let registry_handle = Arc::clone(registry.inner());
    let game_id = state.game.id.clone();
    let board = state.board.clone();
    let you = state.you.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let result = registry_handle.evaluate(&game_id, &board, &you);
        if crate::profile::is_profiling_enabled() {
            crate::profile::merge_thread_local();
        }
        result
    })
    .await;

    let direction = match outcome {
        Ok(Ok(direction)) => direction,
        Ok(Err(e)) => {
            error!("game {}: move rejected: {}", state.game.id, e);
            return Err(status_for(&e));
        }
        Err(e) => {
            error!("game {}: evaluation task failed: {}", state.game.id, e);
            return Err(Status::InternalServerError);
        }
    };

    info!(
        "Turn {}: Chose {} (time: {}ms)",
        state.turn,
        direction.as_str(),
        start_time.elapsed().as_millis()
    );

    decision_log.record(&state.game.id, state.turn, &state.board, &state.you, direction);

    Ok(Json(json!({ "move": direction.as_str() })))
}

/// POST /end endpoint
/// Called when a game ends - removes the session, safe for unknown games
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(registry: &rocket::State<Arc<SessionRegistry>>, end_req: Json<GameState>) -> Status {
    registry.remove(&end_req.game.id);

    Status::Ok
}

/// Maps a session error onto the status reported back to the game engine
fn status_for(error: &SessionError) -> Status {
    match error {
        SessionError::AlreadyExists(_) => Status::Conflict,
        SessionError::NotFound(_) => Status::NotFound,
        SessionError::UnknownStrategy(_) => Status::InternalServerError,
        SessionError::Board(_) => Status::BadRequest,
    }
}
