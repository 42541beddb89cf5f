//! Player-facing text.

use casebook_core::rng::DeterministicRng;
use casebook_progress::domain::advance::Boundary;

/// Shown when the reader confirms before scrolling to the end.
pub const READ_TO_END: &str = "Read the whole case file before moving on.";
/// Shown when the object selection is wrong.
pub const SELECTION_WRONG: &str =
    "That is not quite the right set of objects. Look at the picture again.";
/// Shown after a wrong answer on a replayed scene.
pub const REPLAY_WRONG: &str = "Not quite. Try this one again.";
/// Shown after a right answer on a replayed scene.
pub const REPLAY_RIGHT: &str = "Correct!";
/// Shown when the retry limit sends the player back to the reading.
pub const REVIEW_FORCED: &str =
    "Too many wrong answers. Go back over the case file before trying again.";
/// Shown when a session fails to load.
pub const CONTENT_FAILED: &str = "This chapter could not be loaded. Please try again later.";
/// Shown when a commit gave up.
pub const DISCONNECTED: &str =
    "We lost the connection and could not save your progress. Reconnect to continue.";

/// Shown when the reading timer has not run out.
#[must_use]
pub fn read_longer(remaining_secs: i64) -> String {
    format!("Take a little more time with the case file ({remaining_secs}s left).")
}

/// Shown after a wrong first-play answer with retries left.
#[must_use]
pub fn attempts_left(remaining: u32) -> String {
    if remaining == 1 {
        "Not quite. You have 1 attempt left.".to_owned()
    } else {
        format!("Not quite. You have {remaining} attempts left.")
    }
}

/// The kind of milestone a genuine commit reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Congratulation {
    /// A session (or the whole course) was finished.
    ChapterComplete,
    /// A level was finished.
    LevelComplete,
    /// A scene was cleared.
    SceneComplete,
}

const CHAPTER_POOL: &[&str] = &[
    "Chapter complete! The case moves on.",
    "You closed the chapter. Well done, detective.",
    "Another chapter solved!",
];

const LEVEL_POOL: &[&str] = &[
    "Level complete!",
    "You cracked this part of the case.",
    "Level solved. On to the next lead.",
];

const SCENE_POOL: &[&str] = &["Well spotted!", "Correct!", "Nicely done.", "Right on."];

impl Congratulation {
    /// Milestone for the largest boundary crossed.
    #[must_use]
    pub fn for_boundary(boundary: Boundary) -> Self {
        match boundary {
            Boundary::Session | Boundary::Course => Self::ChapterComplete,
            Boundary::Level => Self::LevelComplete,
            Boundary::Scene => Self::SceneComplete,
        }
    }

    /// The message pool.
    #[must_use]
    pub fn pool(self) -> &'static [&'static str] {
        match self {
            Self::ChapterComplete => CHAPTER_POOL,
            Self::LevelComplete => LEVEL_POOL,
            Self::SceneComplete => SCENE_POOL,
        }
    }

    /// Picks a message from the pool.
    #[must_use]
    pub fn pick(self, rng: &mut dyn DeterministicRng) -> &'static str {
        let pool = self.pool();
        rng.pick_index(pool.len()).map_or(pool[0], |i| pool[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_test_support::SequenceRng;

    #[test]
    fn test_boundary_selects_congratulation_kind() {
        assert_eq!(
            Congratulation::for_boundary(Boundary::Session),
            Congratulation::ChapterComplete
        );
        assert_eq!(
            Congratulation::for_boundary(Boundary::Course),
            Congratulation::ChapterComplete
        );
        assert_eq!(
            Congratulation::for_boundary(Boundary::Level),
            Congratulation::LevelComplete
        );
        assert_eq!(
            Congratulation::for_boundary(Boundary::Scene),
            Congratulation::SceneComplete
        );
    }

    #[test]
    fn test_pick_uses_injected_rng() {
        let mut rng = SequenceRng::new(vec![1, 99]);

        assert_eq!(Congratulation::LevelComplete.pick(&mut rng), LEVEL_POOL[1]);
        assert_eq!(Congratulation::SceneComplete.pick(&mut rng), SCENE_POOL[3]);
    }

    #[test]
    fn test_attempts_left_wording() {
        assert_eq!(attempts_left(2), "Not quite. You have 2 attempts left.");
        assert_eq!(attempts_left(1), "Not quite. You have 1 attempt left.");
    }
}
