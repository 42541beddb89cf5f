//! Director tuning.

use casebook_core::geometry::Scale;
use casebook_progress::application::commit::CommitPolicy;
use casebook_progress::domain::retry::DEFAULT_RETRY_LIMIT;
use chrono::Duration;

/// Gate durations, retry limit and presentation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorConfig {
    /// Reading time on first visit.
    pub reading_time: Duration,
    /// Reading time on replay or forced review.
    pub review_reading_time: Duration,
    /// Scene attempt time on a first attempt.
    pub attempt_time: Duration,
    /// Scene attempt time while retrying.
    pub retry_attempt_time: Duration,
    /// Incorrect answers allowed before a forced review.
    pub retry_limit: u32,
    /// Scale from design units to pixels.
    pub scale: Scale,
    /// Line height of reading material, in design units.
    pub paper_line_height: f32,
    /// Commit timeouts and backoff.
    pub commit_policy: CommitPolicy,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            reading_time: Duration::seconds(60),
            review_reading_time: Duration::seconds(20),
            attempt_time: Duration::seconds(10),
            retry_attempt_time: Duration::seconds(5),
            retry_limit: DEFAULT_RETRY_LIMIT,
            scale: Scale::IDENTITY,
            paper_line_height: 24.0,
            commit_policy: CommitPolicy::default(),
        }
    }
}
