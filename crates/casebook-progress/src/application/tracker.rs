//! The progress tracker.
//!
//! Wraps a player's cursor together with the store it is persisted to. The
//! in-memory cursor only moves after the store accepted the commit.

use std::sync::Arc;

use casebook_core::clock::Clock;
use casebook_core::error::DomainError;
use casebook_core::progress::{Progress, ScenePosition};
use casebook_core::store::{CommitRecord, ProgressStore};
use tracing::info;
use uuid::Uuid;

use super::commit::{CommitPolicy, commit_with_retry, load_with_retry};
use crate::domain::advance::{Advance, LevelShape};

/// One player's progress cursor and its persistence.
pub struct ProgressTracker {
    player_id: Uuid,
    progress: Progress,
    store: Arc<dyn ProgressStore>,
    clock: Arc<dyn Clock>,
    policy: CommitPolicy,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("player_id", &self.player_id)
            .field("progress", &self.progress)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ProgressTracker {
    /// Creates a tracker at a known cursor.
    #[must_use]
    pub fn new(
        player_id: Uuid,
        progress: Progress,
        store: Arc<dyn ProgressStore>,
        clock: Arc<dyn Clock>,
        policy: CommitPolicy,
    ) -> Self {
        Self {
            player_id,
            progress,
            store,
            clock,
            policy,
        }
    }

    /// Restores the cursor of `player_id` from the store. New players start
    /// at the origin.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the store cannot be reached
    /// within the policy's attempts.
    pub async fn load(
        player_id: Uuid,
        store: Arc<dyn ProgressStore>,
        clock: Arc<dyn Clock>,
        policy: CommitPolicy,
    ) -> Result<Self, DomainError> {
        let progress = load_with_retry(store.as_ref(), player_id, &policy)
            .await?
            .unwrap_or_default();
        info!(%player_id, position = %progress.position(), retrying = progress.is_retrying(), "progress loaded");
        Ok(Self::new(player_id, progress, store, clock, policy))
    }

    /// The player.
    #[must_use]
    pub fn player_id(&self) -> Uuid {
        self.player_id
    }

    /// The current cursor.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns `true` if `(session, level)` is unlocked.
    #[must_use]
    pub fn validate(&self, session: u32, level: u32) -> bool {
        self.progress.allows(session, level)
    }

    /// Like [`validate`](Self::validate), as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AccessDenied` for locked content.
    pub fn check_access(&self, session: u32, level: u32) -> Result<(), DomainError> {
        if self.validate(session, level) {
            Ok(())
        } else {
            Err(DomainError::AccessDenied { session, level })
        }
    }

    /// Returns `true` if `position` was already cleared.
    #[must_use]
    pub fn is_replay(&self, position: ScenePosition) -> bool {
        self.progress.is_ahead_of(position)
    }

    /// Returns `true` if the reading for `(session, level)` was already done:
    /// the level is behind the frontier, or the frontier level has cleared
    /// scenes.
    #[must_use]
    pub fn is_level_replay(&self, session: u32, level: u32) -> bool {
        let frontier = (self.progress.session, self.progress.level);
        frontier > (session, level) || (frontier == (session, level) && self.progress.scene.index > 0)
    }

    /// Returns `true` if `position` is the frontier scene and has a failed
    /// attempt.
    #[must_use]
    pub fn is_retrying(&self, position: ScenePosition) -> bool {
        self.progress.position() == position && self.progress.is_retrying()
    }

    /// Scene to start at when entering `(session, level)`: the frontier
    /// scene inside the frontier level, otherwise the first.
    #[must_use]
    pub fn resume_scene(&self, session: u32, level: u32) -> u32 {
        if (self.progress.session, self.progress.level) == (session, level) {
            self.progress.scene.index
        } else {
            0
        }
    }

    /// Persists `progress` with the summaries of the screen that produced it.
    ///
    /// Returns the store's sequence, `0` meaning no new durable commit.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `progress` is behind the current
    /// cursor and `DomainError::Persistence` if the store gave up.
    pub async fn commit(
        &mut self,
        progress: Progress,
        summaries: Vec<serde_json::Value>,
    ) -> Result<u64, DomainError> {
        if progress.position() < self.progress.position() {
            return Err(DomainError::Validation(format!(
                "commit to {} would regress progress at {}",
                progress.position(),
                self.progress.position()
            )));
        }
        let record = CommitRecord {
            player_id: self.player_id,
            correlation_id: Uuid::new_v4(),
            progress,
            summaries,
            committed_at: self.clock.now(),
        };
        let sequence = commit_with_retry(self.store.as_ref(), &record, &self.policy).await?;
        self.progress = progress;
        info!(
            player_id = %self.player_id,
            correlation_id = %record.correlation_id,
            position = %progress.position(),
            retrying = progress.is_retrying(),
            sequence,
            "progress committed"
        );
        Ok(sequence)
    }

    /// Wraps a position whose scene index ran past its level and commits the
    /// wrapped cursor with no summaries.
    ///
    /// Returns `None` when `position` is inside its level. The cursor is only
    /// committed when the wrapped position is ahead of it.
    ///
    /// # Errors
    ///
    /// Returns the commit error.
    pub async fn advance_on_scene_overflow(
        &mut self,
        position: ScenePosition,
        shape: LevelShape,
    ) -> Result<Option<Advance>, DomainError> {
        if position.scene < shape.scene_count {
            return Ok(None);
        }
        let advance = Advance::normalize(position, shape);
        if advance.next > self.progress.position() {
            self.commit(Progress::at(advance.next), Vec::new()).await?;
        }
        Ok(Some(advance))
    }
}
