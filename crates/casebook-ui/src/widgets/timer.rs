use casebook_core::geometry::Rect;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::component::{Component, DrawContext};
use crate::render::{DrawOp, Tone};

/// A countdown gate.
///
/// The timer never ticks on its own; it compares the start time against the
/// time it is asked about.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    /// Display area.
    pub bounds: Rect,
    started_at: DateTime<Utc>,
    duration: Duration,
}

impl Timer {
    /// Starts a countdown of `duration` at `started_at`.
    #[must_use]
    pub fn start(bounds: Rect, started_at: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            bounds,
            started_at,
            duration,
        }
    }

    /// The configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns `true` once `duration` has elapsed at `now`.
    #[must_use]
    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at >= self.duration
    }

    /// Whole seconds left at `now`, rounded up.
    #[must_use]
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.duration - (now - self.started_at);
        if remaining <= Duration::zero() {
            return 0;
        }
        let millis = remaining.num_milliseconds();
        (millis + 999) / 1000
    }
}

impl Component for Timer {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        let (text, tone) = if self.is_finished(ctx.now) {
            ("ready".to_owned(), Tone::Accent)
        } else {
            (format!("{}s", self.remaining_secs(ctx.now)), Tone::Muted)
        };
        ops.push(DrawOp::Text {
            rect: self.bounds,
            text,
            tone,
        });
    }

    fn summary(&self) -> serde_json::Value {
        json!({
            "kind": "timer",
            "started_at": self.started_at,
            "duration_secs": self.duration.num_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timer_finishes_exactly_at_duration() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let timer = Timer::start(Rect::default(), start, Duration::seconds(10));

        assert!(!timer.is_finished(start + Duration::milliseconds(9_999)));
        assert!(timer.is_finished(start + Duration::seconds(10)));
        assert_eq!(timer.remaining_secs(start + Duration::milliseconds(8_500)), 2);
        assert_eq!(timer.remaining_secs(start + Duration::seconds(30)), 0);
    }
}
