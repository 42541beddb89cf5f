//! Casebook — game host.
//!
//! Serves directors over HTTP/JSON: one director per game, input in, frame
//! out.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod routes;
pub mod state;

/// Builds the full router over `state`.
// TODO: Replace CorsLayer::permissive() with the client's origin once it is deployed.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/games", routes::games::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
