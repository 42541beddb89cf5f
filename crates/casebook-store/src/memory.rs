//! In-memory progress store for local play.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use casebook_core::error::DomainError;
use casebook_core::progress::Progress;
use casebook_core::store::{CommitRecord, ProgressStore};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    cursors: HashMap<Uuid, Progress>,
    sequence: u64,
}

/// Keeps cursors in a map.
///
/// A commit that does not change the stored cursor answers `0`; anything
/// else gets the next store-wide sequence number.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    inner: Mutex<Inner>,
}

impl MemoryProgressStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, DomainError> {
        self.inner
            .lock()
            .map_err(|_| DomainError::Persistence("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load(&self, player_id: Uuid) -> Result<Option<Progress>, DomainError> {
        Ok(self.lock()?.cursors.get(&player_id).copied())
    }

    async fn commit(&self, record: &CommitRecord) -> Result<u64, DomainError> {
        let mut inner = self.lock()?;
        if inner.cursors.get(&record.player_id) == Some(&record.progress) {
            debug!(player_id = %record.player_id, "commit unchanged");
            return Ok(0);
        }
        inner.cursors.insert(record.player_id, record.progress);
        inner.sequence += 1;
        Ok(inner.sequence)
    }
}

#[cfg(test)]
mod tests {
    use casebook_core::progress::ScenePosition;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn record(player_id: Uuid, progress: Progress) -> CommitRecord {
        CommitRecord {
            player_id,
            correlation_id: Uuid::new_v4(),
            progress,
            summaries: Vec::new(),
            committed_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_commit_sequences_and_unchanged_commits() {
        // Arrange
        let store = MemoryProgressStore::new();
        let player = Uuid::new_v4();
        let next = Progress::at(ScenePosition::new(0, 0, 1));

        // Act
        let first = store.commit(&record(player, next)).await.unwrap();
        let repeat = store.commit(&record(player, next)).await.unwrap();
        let failed = store
            .commit(&record(player, next.with_failed_attempt()))
            .await
            .unwrap();

        // Assert
        assert_eq!(first, 1);
        assert_eq!(repeat, 0);
        assert_eq!(failed, 2);
        assert_eq!(
            store.load(player).await.unwrap(),
            Some(next.with_failed_attempt())
        );
    }

    #[tokio::test]
    async fn test_players_are_independent() {
        let store = MemoryProgressStore::new();
        let a = Uuid::new_v4();

        store
            .commit(&record(a, Progress::at(ScenePosition::new(2, 0, 0))))
            .await
            .unwrap();

        assert!(store.load(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.load(a).await.unwrap().is_some());
    }
}
