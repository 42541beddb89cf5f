//! Casebook game host entry point.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use casebook_content::application::resolver::YamlContentResolver;
use casebook_core::clock::SystemClock;
use casebook_core::geometry::Scale;
use casebook_core::rng::{DeterministicRng, SystemRng};
use casebook_core::store::ProgressStore;
use casebook_director::{DirectorConfig, UserAgentGate};
use casebook_server::error::AppError;
use casebook_server::state::{AppState, DEFAULT_IDLE_TIMEOUT};
use casebook_store::{HttpProgressStore, MemoryProgressStore};
use tracing_subscriber::EnvFilter;

/// Reads `name`, falling back to `default` when unset.
fn env_or<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| AppError::Config(format!("{name} is invalid: {e}"))),
        Err(_) => Ok(default),
    }
}

fn system_rng() -> Box<dyn DeterministicRng> {
    Box::new(SystemRng::new())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Casebook game host");

    // Read configuration from environment.
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env_or("PORT", 3000)?;
    let content_root = std::env::var("CONTENT_ROOT").unwrap_or_else(|_| "content".to_string());
    let course_file = std::env::var("COURSE_FILE").unwrap_or_else(|_| "course.yaml".to_string());
    let scale = Scale(env_or("SCALE", 1.0_f32)?);
    if !scale.0.is_finite() || scale.0 <= 0.0 {
        return Err(AppError::Config("SCALE must be a positive number".into()));
    }
    let config = DirectorConfig {
        retry_limit: env_or("RETRY_LIMIT", DirectorConfig::default().retry_limit)?,
        scale,
        ..DirectorConfig::default()
    };
    let idle_timeout = Duration::from_secs(env_or(
        "GAME_IDLE_SECS",
        DEFAULT_IDLE_TIMEOUT.as_secs(),
    )?);
    let blocked = std::env::var("BLOCKED_USER_AGENTS").unwrap_or_default();
    let gate = UserAgentGate::new(
        blocked
            .split(',')
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty()),
    );

    // Load the course map; sessions are resolved on demand.
    let resolver = Arc::new(YamlContentResolver::new(content_root, scale));
    let course = resolver.load_course(&course_file).await?;

    let store: Arc<dyn ProgressStore> = match std::env::var("PROGRESS_STORE_URL") {
        Ok(url) => {
            tracing::info!(%url, "using HTTP progress store");
            Arc::new(HttpProgressStore::new(url))
        }
        Err(_) => {
            tracing::warn!("PROGRESS_STORE_URL not set, progress is kept in memory");
            Arc::new(MemoryProgressStore::new())
        }
    };

    // Build application state.
    let app_state = AppState::new(
        Arc::new(course),
        resolver,
        store,
        Arc::new(SystemClock),
        system_rng,
        Arc::new(gate),
        config,
    )
    .with_idle_timeout(idle_timeout);

    let app = casebook_server::app(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
