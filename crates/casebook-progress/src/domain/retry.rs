//! Per-scene retry counting.

use std::collections::HashMap;

use casebook_core::progress::ScenePosition;

/// Default number of incorrect answers allowed before a forced review.
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Outcome of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryVerdict {
    /// The player may try again this many more times.
    Remaining(u32),
    /// The limit was reached; the counter has been reset.
    Exhausted,
}

/// Counts incorrect first-play answers per scene.
///
/// Counts live only as long as the game instance and are keyed by the
/// position's `session-level-scene` form.
#[derive(Debug, Clone)]
pub struct RetryCounter {
    limit: u32,
    counts: HashMap<String, u32>,
}

impl Default for RetryCounter {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_LIMIT)
    }
}

impl RetryCounter {
    /// Creates a counter with the given limit. A limit of zero behaves as one.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            counts: HashMap::new(),
        }
    }

    /// The configured limit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Current count for `position`.
    #[must_use]
    pub fn count(&self, position: ScenePosition) -> u32 {
        self.counts.get(&position.to_string()).copied().unwrap_or(0)
    }

    /// Records an incorrect answer at `position`.
    pub fn record_failure(&mut self, position: ScenePosition) -> RetryVerdict {
        let key = position.to_string();
        let count = self.counts.entry(key.clone()).or_insert(0);
        *count += 1;
        if *count >= self.limit {
            self.counts.remove(&key);
            RetryVerdict::Exhausted
        } else {
            RetryVerdict::Remaining(self.limit - *count)
        }
    }

    /// Clears the count for `position` after a correct answer.
    pub fn reset(&mut self, position: ScenePosition) {
        self.counts.remove(&position.to_string());
    }
}
