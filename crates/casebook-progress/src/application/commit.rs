//! Store calls with per-attempt timeouts and exponential backoff.

use std::time::Duration;

use casebook_core::error::DomainError;
use casebook_core::progress::Progress;
use casebook_core::store::{CommitRecord, ProgressStore};
use tracing::{error, warn};
use uuid::Uuid;

/// How hard a commit tries before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitPolicy {
    /// Upper bound on a single store call.
    pub timeout: Duration,
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Cap on the doubling delay.
    pub max_backoff: Duration,
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl CommitPolicy {
    /// Delay after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Runs `call` under the policy's per-attempt timeout, backing off between
/// failures. Returns the last error text once every attempt has failed.
async fn retrying<T, F, Fut>(
    policy: &CommitPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match tokio::time::timeout(policy.timeout, call()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => last_error = format!("timed out after {:?}", policy.timeout),
        }
        if attempt < attempts {
            let delay = policy.backoff(attempt);
            warn!(operation, attempt, ?delay, error = %last_error, "store call failed, retrying");
            tokio::time::sleep(delay).await;
        }
    }
    Err(last_error)
}

/// Sends `record` to `store`, retrying on errors and timeouts.
///
/// # Errors
///
/// Returns `DomainError::Persistence` once every attempt has failed.
pub async fn commit_with_retry(
    store: &dyn ProgressStore,
    record: &CommitRecord,
    policy: &CommitPolicy,
) -> Result<u64, DomainError> {
    retrying(policy, "commit", || store.commit(record))
        .await
        .map_err(|last_error| {
            let attempts = policy.attempts.max(1);
            error!(
                correlation_id = %record.correlation_id,
                attempts,
                error = %last_error,
                "commit abandoned"
            );
            DomainError::Persistence(format!(
                "commit failed after {attempts} attempts: {last_error}"
            ))
        })
}

/// Reads the cursor of `player_id`, with the same timeouts and backoff as
/// commits.
///
/// # Errors
///
/// Returns `DomainError::Persistence` once every attempt has failed.
pub async fn load_with_retry(
    store: &dyn ProgressStore,
    player_id: Uuid,
    policy: &CommitPolicy,
) -> Result<Option<Progress>, DomainError> {
    retrying(policy, "load", || store.load(player_id))
        .await
        .map_err(|last_error| {
            let attempts = policy.attempts.max(1);
            error!(%player_id, attempts, error = %last_error, "progress load abandoned");
            DomainError::Persistence(format!(
                "loading progress failed after {attempts} attempts: {last_error}"
            ))
        })
}
