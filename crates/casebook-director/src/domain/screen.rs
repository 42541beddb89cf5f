//! Director states.

use casebook_core::progress::ScenePosition;
use serde::Serialize;

/// The active screen of the progression chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    /// The course map.
    PickingSession,
    /// A session's level map.
    PickingLevel {
        /// Session shown.
        session: u32,
    },
    /// The timed reading gate of a level.
    ReadingPaper {
        /// Session index.
        session: u32,
        /// Level index.
        level: u32,
        /// Sent back here by the retry limit.
        forced_review: bool,
    },
    /// The object selection check of a level.
    SelectingObjects {
        /// Session index.
        session: u32,
        /// Level index.
        level: u32,
    },
    /// A scene before its question is revealed.
    PlayingScene {
        /// The scene.
        position: ScenePosition,
        /// Whether the scene was already cleared.
        replay: bool,
    },
    /// A revealed scene awaiting the answer check.
    ScenePostAnswer {
        /// The scene.
        position: ScenePosition,
        /// Whether the scene was already cleared.
        replay: bool,
    },
}

impl Screen {
    /// The session this screen belongs to, if any.
    #[must_use]
    pub fn session(&self) -> Option<u32> {
        match *self {
            Self::PickingSession => None,
            Self::PickingLevel { session }
            | Self::ReadingPaper { session, .. }
            | Self::SelectingObjects { session, .. } => Some(session),
            Self::PlayingScene { position, .. } | Self::ScenePostAnswer { position, .. } => {
                Some(position.session)
            }
        }
    }

    /// Whether the renderer stays frozen on this screen.
    #[must_use]
    pub fn freezes(&self) -> bool {
        matches!(self, Self::ScenePostAnswer { .. })
    }
}

/// A modal layer over the active screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "overlay", rename_all = "snake_case")]
pub enum Overlay {
    /// A message with a dismiss button.
    Alert {
        /// Message text.
        message: String,
    },
    /// The navigation menu.
    Menu,
    /// A commit gave up; only reconnecting is possible.
    Disconnected {
        /// Message text.
        message: String,
    },
}
