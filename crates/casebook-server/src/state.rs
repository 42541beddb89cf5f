//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use casebook_content::application::resolver::ContentResolver;
use casebook_content::domain::model::Course;
use casebook_core::clock::Clock;
use casebook_core::rng::DeterministicRng;
use casebook_core::store::ProgressStore;
use casebook_director::{Director, DirectorConfig, EnvironmentGate};
use casebook_ui::FrameRecorder;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

/// A running game. Input to one game is handled one event at a time.
pub type Game = Arc<Mutex<Director<FrameRecorder>>>;

/// How long a game may go untouched before it is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Clone)]
struct Slot {
    game: Game,
    touched: Instant,
}

/// Builds the RNG a new director picks messages with.
pub type RngFactory = fn() -> Box<dyn DeterministicRng>;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The course map.
    pub course: Arc<Course>,
    /// Session content source.
    pub resolver: Arc<dyn ContentResolver>,
    /// Durable progress.
    pub store: Arc<dyn ProgressStore>,
    /// Time source for timers and commit timestamps.
    pub clock: Arc<dyn Clock>,
    /// RNG for each new director.
    pub rng: RngFactory,
    /// Client admission check.
    pub gate: Arc<dyn EnvironmentGate>,
    /// Director tuning.
    pub config: DirectorConfig,
    idle_timeout: Duration,
    games: Arc<RwLock<HashMap<Uuid, Slot>>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.course.session_count())
            .field("config", &self.config)
            .field("idle_timeout", &self.idle_timeout)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state with no running games.
    #[must_use]
    pub fn new(
        course: Arc<Course>,
        resolver: Arc<dyn ContentResolver>,
        store: Arc<dyn ProgressStore>,
        clock: Arc<dyn Clock>,
        rng: RngFactory,
        gate: Arc<dyn EnvironmentGate>,
        config: DirectorConfig,
    ) -> Self {
        Self {
            course,
            resolver,
            store,
            clock,
            rng,
            gate,
            config,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Drops games untouched for longer than `idle_timeout` when the next
    /// game is registered.
    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Registers a game under a fresh id, first dropping idle games.
    pub async fn insert_game(&self, director: Director<FrameRecorder>) -> (Uuid, Game) {
        let id = Uuid::new_v4();
        let game = Arc::new(Mutex::new(director));
        let mut games = self.games.write().await;
        let before = games.len();
        games.retain(|_, slot| slot.touched.elapsed() < self.idle_timeout);
        let evicted = before - games.len();
        if evicted > 0 {
            info!(evicted, "idle games dropped");
        }
        games.insert(
            id,
            Slot {
                game: game.clone(),
                touched: Instant::now(),
            },
        );
        (id, game)
    }

    /// The game registered under `id`, marked as touched.
    pub async fn game(&self, id: Uuid) -> Option<Game> {
        let mut games = self.games.write().await;
        let slot = games.get_mut(&id)?;
        slot.touched = Instant::now();
        Some(slot.game.clone())
    }

    /// Unregisters the game under `id`, returning it if it was running.
    pub async fn remove_game(&self, id: Uuid) -> Option<Game> {
        self.games.write().await.remove(&id).map(|slot| slot.game)
    }

    /// Number of registered games.
    pub async fn game_count(&self) -> usize {
        self.games.read().await.len()
    }
}
