//! Routes for running games.
//!
//! A game is one director behind a mutex. Every response carries the
//! director's state and the frame it last drew.

use axum::extract::{Path, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use casebook_core::progress::Progress;
use casebook_director::{ClientEnvironment, Director, Overlay, Screen};
use casebook_progress::application::tracker::ProgressTracker;
use casebook_ui::{Frame, FrameRecorder, Input};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{AppState, Game};

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// The player whose progress the game restores and commits.
    pub player_id: Uuid,
}

/// A game's state as seen by the client.
#[derive(Debug, Serialize)]
pub struct GameView {
    /// The game.
    pub game_id: Uuid,
    /// Active screen.
    pub screen: Screen,
    /// Active overlay, if any.
    pub overlay: Option<Overlay>,
    /// The player's cursor.
    pub progress: Progress,
    /// The most recent frame.
    pub frame: Frame,
}

impl GameView {
    fn of(game_id: Uuid, director: &Director<FrameRecorder>) -> Self {
        Self {
            game_id,
            screen: director.screen(),
            overlay: director.overlay().cloned(),
            progress: director.progress(),
            frame: director.renderer().last_frame().cloned().unwrap_or_default(),
        }
    }
}

async fn find(state: &AppState, game_id: Uuid) -> Result<Game, ApiError> {
    state
        .game(game_id)
        .await
        .ok_or(ApiError::GameNotFound(game_id))
}

/// POST /
#[instrument(skip(state, headers, request), fields(player_id = %request.player_id))]
async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let client = ClientEnvironment {
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    };
    if let Err(refusal) = state.gate.check(&client) {
        warn!(user_agent = ?client.user_agent, "client refused");
        return Err(refusal.into());
    }

    let tracker = ProgressTracker::load(
        request.player_id,
        state.store.clone(),
        state.clock.clone(),
        state.config.commit_policy,
    )
    .await?;
    let director = Director::new(
        state.config.clone(),
        state.course.clone(),
        state.resolver.clone(),
        tracker,
        state.clock.clone(),
        (state.rng)(),
        FrameRecorder::new(),
    );
    let (game_id, game) = state.insert_game(director).await;
    info!(%game_id, "game created");

    let director = game.lock().await;
    Ok((StatusCode::CREATED, Json(GameView::of(game_id, &director))))
}

/// GET /{game_id}/frame
///
/// Redraws before answering so running timers are current.
#[instrument(skip(state))]
async fn get_frame(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let game = find(&state, game_id).await?;
    let mut director = game.lock().await;
    director.redraw();
    Ok(Json(GameView::of(game_id, &director)))
}

/// POST /{game_id}/input
#[instrument(skip(state, input))]
async fn post_input(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(input): Json<Input>,
) -> Result<Json<GameView>, ApiError> {
    let game = find(&state, game_id).await?;
    let mut director = game.lock().await;
    director.handle(input).await;
    Ok(Json(GameView::of(game_id, &director)))
}

/// DELETE /{game_id}
#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .remove_game(game_id)
        .await
        .ok_or(ApiError::GameNotFound(game_id))?;
    info!(%game_id, "game ended");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for games.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game))
        .route("/{game_id}", delete(delete_game))
        .route("/{game_id}/frame", get(get_frame))
        .route("/{game_id}/input", post(post_input))
}
