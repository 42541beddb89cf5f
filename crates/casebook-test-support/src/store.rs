//! Test stores — mock `ProgressStore` implementations for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use casebook_core::error::DomainError;
use casebook_core::progress::Progress;
use casebook_core::store::{CommitRecord, ProgressStore};
use uuid::Uuid;

/// A progress store that records every commit. `load` returns the configured
/// cursor; `commit` returns the 1-based commit count, or a fixed sequence
/// when one is configured.
#[derive(Debug)]
pub struct RecordingProgressStore {
    loaded: Option<Progress>,
    fixed_sequence: Option<u64>,
    commits: Mutex<Vec<CommitRecord>>,
}

impl RecordingProgressStore {
    /// Create a store whose `load` returns `loaded`.
    #[must_use]
    pub fn new(loaded: Option<Progress>) -> Self {
        Self {
            loaded,
            fixed_sequence: None,
            commits: Mutex::new(Vec::new()),
        }
    }

    /// Make every commit return `sequence`. `0` models a store that made no
    /// new durable commit.
    #[must_use]
    pub fn with_fixed_sequence(mut self, sequence: u64) -> Self {
        self.fixed_sequence = Some(sequence);
        self
    }

    /// Returns a snapshot of all commits received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.commits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressStore for RecordingProgressStore {
    async fn load(&self, _player_id: Uuid) -> Result<Option<Progress>, DomainError> {
        Ok(self.loaded)
    }

    async fn commit(&self, record: &CommitRecord) -> Result<u64, DomainError> {
        let mut commits = self.commits.lock().unwrap();
        commits.push(record.clone());
        Ok(self.fixed_sequence.unwrap_or(commits.len() as u64))
    }
}

/// A progress store that always returns a persistence error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingProgressStore;

#[async_trait]
impl ProgressStore for FailingProgressStore {
    async fn load(&self, _player_id: Uuid) -> Result<Option<Progress>, DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }

    async fn commit(&self, _record: &CommitRecord) -> Result<u64, DomainError> {
        Err(DomainError::Persistence("connection refused".into()))
    }
}

/// A progress store whose first `failures` commits fail, optionally after
/// letting a few through. Later commits succeed and are recorded. `load`
/// always returns `None`.
#[derive(Debug)]
pub struct FlakyProgressStore {
    healthy_first: u32,
    failures: u32,
    attempts: AtomicU32,
    commits: Mutex<Vec<CommitRecord>>,
}

impl FlakyProgressStore {
    /// Create a store that fails `failures` times before recovering.
    #[must_use]
    pub fn new(failures: u32) -> Self {
        Self {
            healthy_first: 0,
            failures,
            attempts: AtomicU32::new(0),
            commits: Mutex::new(Vec::new()),
        }
    }

    /// Let the first `count` commits through before the failures start.
    #[must_use]
    pub fn after_successes(mut self, count: u32) -> Self {
        self.healthy_first = count;
        self
    }

    /// Number of commit calls, failed or not.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Returns a snapshot of the commits that succeeded.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.commits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressStore for FlakyProgressStore {
    async fn load(&self, _player_id: Uuid) -> Result<Option<Progress>, DomainError> {
        Ok(None)
    }

    async fn commit(&self, record: &CommitRecord) -> Result<u64, DomainError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt > self.healthy_first && attempt <= self.healthy_first + self.failures {
            return Err(DomainError::Persistence(format!("attempt {attempt} dropped")));
        }
        let mut commits = self.commits.lock().unwrap();
        commits.push(record.clone());
        Ok(commits.len() as u64)
    }
}

/// A progress store that never answers, neither loads nor commits. Useful
/// for testing timeouts.
#[derive(Debug)]
pub struct StallingProgressStore;

#[async_trait]
impl ProgressStore for StallingProgressStore {
    async fn load(&self, _player_id: Uuid) -> Result<Option<Progress>, DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn commit(&self, _record: &CommitRecord) -> Result<u64, DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(0)
    }
}
