//! The progress cursor.
//!
//! A player's durable position is `(session, level, scene)`. The scene part
//! carries an explicit attempt state: `Failed` marks a scene that was answered
//! incorrectly at least once and not yet passed. On the wire the scene keeps
//! its historical numeric form, `N` for a clean cursor and `N.5` for a failed
//! one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Whether the frontier scene has been failed since it was reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptState {
    /// Not attempted yet, or the last attempt advanced the cursor.
    #[default]
    Clean,
    /// Attempted and failed at least once, not yet passed.
    Failed,
}

/// The scene component of the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SceneCursor {
    /// Frontier scene index within the frontier level.
    pub index: u32,
    /// Attempt state of that scene.
    pub attempt: AttemptState,
}

impl SceneCursor {
    /// A clean cursor at `index`.
    #[must_use]
    pub fn clean(index: u32) -> Self {
        Self {
            index,
            attempt: AttemptState::Clean,
        }
    }

    /// A failed cursor at `index`.
    #[must_use]
    pub fn failed(index: u32) -> Self {
        Self {
            index,
            attempt: AttemptState::Failed,
        }
    }

    /// Encodes the cursor in the legacy numeric form.
    #[must_use]
    pub fn to_legacy(self) -> f64 {
        let base = f64::from(self.index);
        match self.attempt {
            AttemptState::Clean => base,
            AttemptState::Failed => base + 0.5,
        }
    }

    /// Decodes the legacy numeric form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for negative, non-finite or
    /// out-of-range values, and for fractions other than `.0` and `.5`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_legacy(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < 0.0 || value >= f64::from(u32::MAX) {
            return Err(DomainError::Validation(format!(
                "scene cursor {value} is out of range"
            )));
        }
        let index = value.trunc() as u32;
        let fraction = value.fract();
        if fraction.abs() < f64::EPSILON {
            Ok(Self::clean(index))
        } else if (fraction - 0.5).abs() < f64::EPSILON {
            Ok(Self::failed(index))
        } else {
            Err(DomainError::Validation(format!(
                "scene cursor {value} has an unknown attempt marker"
            )))
        }
    }
}

/// A coordinate in the content tree, ordered lexicographically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenePosition {
    /// Session index.
    pub session: u32,
    /// Level index within the session.
    pub level: u32,
    /// Scene index within the level.
    pub scene: u32,
}

impl ScenePosition {
    /// Creates a new position.
    #[must_use]
    pub fn new(session: u32, level: u32, scene: u32) -> Self {
        Self {
            session,
            level,
            scene,
        }
    }
}

impl fmt::Display for ScenePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.session, self.level, self.scene)
    }
}

/// The durable progress cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Frontier session.
    pub session: u32,
    /// Frontier level within the session.
    pub level: u32,
    /// Frontier scene and its attempt state.
    #[serde(with = "legacy_scene")]
    pub scene: SceneCursor,
}

impl Progress {
    /// The cursor of a player who has not started.
    #[must_use]
    pub fn origin() -> Self {
        Self::default()
    }

    /// A clean cursor at `position`.
    #[must_use]
    pub fn at(position: ScenePosition) -> Self {
        Self {
            session: position.session,
            level: position.level,
            scene: SceneCursor::clean(position.scene),
        }
    }

    /// The frontier position, ignoring the attempt state.
    #[must_use]
    pub fn position(&self) -> ScenePosition {
        ScenePosition::new(self.session, self.level, self.scene.index)
    }

    /// Returns `true` if `(session, level)` is unlocked.
    ///
    /// Access is allowed when the cursor is in a later session, or in the
    /// same session at or past `level`.
    #[must_use]
    pub fn allows(&self, session: u32, level: u32) -> bool {
        self.session > session || (self.session == session && self.level >= level)
    }

    /// Returns `true` if the cursor is strictly past `position`.
    #[must_use]
    pub fn is_ahead_of(&self, position: ScenePosition) -> bool {
        self.position() > position
    }

    /// Returns `true` if the frontier scene has a failed attempt.
    #[must_use]
    pub fn is_retrying(&self) -> bool {
        self.scene.attempt == AttemptState::Failed
    }

    /// Returns a copy with the frontier scene marked as failed.
    #[must_use]
    pub fn with_failed_attempt(self) -> Self {
        Self {
            scene: SceneCursor::failed(self.scene.index),
            ..self
        }
    }
}

mod legacy_scene {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::SceneCursor;

    pub(super) fn serialize<S: Serializer>(
        cursor: &SceneCursor,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(cursor.to_legacy())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SceneCursor, D::Error> {
        let value = f64::deserialize(deserializer)?;
        SceneCursor::from_legacy(value).map_err(D::Error::custom)
    }
}
