//! Cursor advancement across level and session boundaries.

use casebook_core::progress::ScenePosition;

/// The largest boundary crossed by an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Boundary {
    /// Stayed within the level.
    Scene,
    /// Entered the next level of the same session.
    Level,
    /// Entered the next session.
    Session,
    /// Finished the last session.
    Course,
}

impl Boundary {
    /// Returns `true` for session and course boundaries.
    #[must_use]
    pub fn closes_session(self) -> bool {
        matches!(self, Self::Session | Self::Course)
    }
}

/// Dimensions needed to wrap a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelShape {
    /// Scenes in the position's level.
    pub scene_count: u32,
    /// Levels in the position's session.
    pub level_count: u32,
    /// Sessions in the course.
    pub session_count: u32,
}

/// Where a position lands after wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// The wrapped position.
    pub next: ScenePosition,
    /// The boundary crossed to get there.
    pub boundary: Boundary,
}

impl Advance {
    /// Moves one scene past `from`, wrapping as needed.
    #[must_use]
    pub fn after(from: ScenePosition, shape: LevelShape) -> Self {
        Self::normalize(
            ScenePosition::new(from.session, from.level, from.scene.saturating_add(1)),
            shape,
        )
    }

    /// Wraps a position whose scene index may be past the end of its level.
    ///
    /// Past the last level the position moves to the next session; past the
    /// last session it becomes `(session_count, 0, 0)`.
    #[must_use]
    pub fn normalize(position: ScenePosition, shape: LevelShape) -> Self {
        if position.scene < shape.scene_count {
            return Self {
                next: position,
                boundary: Boundary::Scene,
            };
        }
        if position.level + 1 < shape.level_count {
            return Self {
                next: ScenePosition::new(position.session, position.level + 1, 0),
                boundary: Boundary::Level,
            };
        }
        if position.session + 1 < shape.session_count {
            return Self {
                next: ScenePosition::new(position.session + 1, 0, 0),
                boundary: Boundary::Session,
            };
        }
        Self {
            next: ScenePosition::new(shape.session_count, 0, 0),
            boundary: Boundary::Course,
        }
    }

    /// Returns `true` if the advance left the level.
    #[must_use]
    pub fn wrapped(&self) -> bool {
        self.boundary != Boundary::Scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: LevelShape = LevelShape {
        scene_count: 2,
        level_count: 3,
        session_count: 2,
    };

    #[test]
    fn test_after_stays_within_level() {
        let advance = Advance::after(ScenePosition::new(0, 0, 0), SHAPE);

        assert_eq!(advance.next, ScenePosition::new(0, 0, 1));
        assert_eq!(advance.boundary, Boundary::Scene);
        assert!(!advance.wrapped());
    }

    #[test]
    fn test_after_last_scene_enters_next_level() {
        let advance = Advance::after(ScenePosition::new(0, 1, 1), SHAPE);

        assert_eq!(advance.next, ScenePosition::new(0, 2, 0));
        assert_eq!(advance.boundary, Boundary::Level);
    }

    #[test]
    fn test_after_last_level_enters_next_session() {
        let advance = Advance::after(ScenePosition::new(0, 2, 1), SHAPE);

        assert_eq!(advance.next, ScenePosition::new(1, 0, 0));
        assert_eq!(advance.boundary, Boundary::Session);
        assert!(advance.boundary.closes_session());
    }

    #[test]
    fn test_after_last_session_completes_course() {
        let advance = Advance::after(ScenePosition::new(1, 2, 1), SHAPE);

        assert_eq!(advance.next, ScenePosition::new(2, 0, 0));
        assert_eq!(advance.boundary, Boundary::Course);
        assert!(advance.boundary.closes_session());
    }

    #[test]
    fn test_normalize_wraps_overflowed_scene_index() {
        let advance = Advance::normalize(ScenePosition::new(0, 0, 7), SHAPE);

        assert_eq!(advance.next, ScenePosition::new(0, 1, 0));
        assert_eq!(advance.boundary, Boundary::Level);
    }
}
