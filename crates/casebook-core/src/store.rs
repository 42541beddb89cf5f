//! Progress store abstraction.
//!
//! The store is the remote session store that durably records the progress
//! cursor together with the interaction summaries of the screen that
//! produced it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::progress::Progress;

/// A single commit sent to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The player whose cursor is committed.
    pub player_id: Uuid,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The new cursor.
    pub progress: Progress,
    /// One summary per component of the screen that produced the commit.
    pub summaries: Vec<serde_json::Value>,
    /// Timestamp of the commit.
    pub committed_at: chrono::DateTime<chrono::Utc>,
}

/// Repository trait for loading and committing progress.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load the stored cursor for a player, `None` for a new player.
    async fn load(&self, player_id: Uuid) -> Result<Option<Progress>, DomainError>;

    /// Commit a new cursor.
    ///
    /// Returns `0` when the store made no new durable commit and a nonzero
    /// sequence number otherwise.
    async fn commit(&self, record: &CommitRecord) -> Result<u64, DomainError>;
}
