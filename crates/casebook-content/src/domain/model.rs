//! The resolved content tree.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use casebook_core::geometry::Rect;
use casebook_ui::Widget;
use casebook_ui::widgets::PaperBlock;

/// Number of selectable object slots on every level's selection picture.
pub const SELECTION_SLOTS: usize = 9;

/// Builds a fresh widget list for one visit of a scene.
pub type SceneFactory = Arc<dyn Fn() -> Vec<Widget> + Send + Sync>;

/// Decides whether the live widget list of a scene answers it correctly.
pub type ScenePredicate = Arc<dyn Fn(&[Widget]) -> bool + Send + Sync>;

/// Opaque locator for a session's content, interpreted by a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionDescriptor(pub String);

/// The course map.
#[derive(Debug, Clone)]
pub struct Course {
    /// Course title.
    pub title: String,
    /// Sessions in unlock order.
    pub sessions: Vec<SessionEntry>,
}

impl Course {
    /// Number of sessions.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn session_count(&self) -> u32 {
        self.sessions.len() as u32
    }

    /// The entry at `index`.
    #[must_use]
    pub fn session(&self, index: u32) -> Option<&SessionEntry> {
        self.sessions.get(index as usize)
    }
}

/// A session as it appears on the course map, before resolution.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Session title.
    pub title: String,
    /// Marker position on the course map.
    pub marker: Rect,
    /// Where the session's content lives.
    pub descriptor: SessionDescriptor,
}

/// A resolved session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session title.
    pub title: String,
    /// Backdrop of the level map.
    pub background: Option<String>,
    /// Levels in unlock order.
    pub levels: Vec<Level>,
}

impl Session {
    /// Number of levels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    /// The level at `index`.
    #[must_use]
    pub fn level(&self, index: u32) -> Option<&Level> {
        self.levels.get(index as usize)
    }
}

/// Reading material gating a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingPaper {
    /// Paper title.
    pub title: String,
    /// Laid-out content.
    pub blocks: Vec<PaperBlock>,
}

/// A level: reading, object selection, then scenes.
#[derive(Debug, Clone)]
pub struct Level {
    /// Level title.
    pub title: String,
    /// Marker position on the level map.
    pub marker: Rect,
    /// Reading material.
    pub paper: ReadingPaper,
    /// Instruction shown on the selection screen.
    pub prompt: String,
    /// Picture the selection slots are laid over.
    pub picture: String,
    /// Selection slot regions, [`SELECTION_SLOTS`] of them.
    pub slots: Vec<Rect>,
    /// Slot indices that make up the correct selection.
    pub correct: BTreeSet<usize>,
    /// Scenes in play order.
    pub scenes: Vec<Scene>,
}

impl Level {
    /// Number of scenes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn scene_count(&self) -> u32 {
        self.scenes.len() as u32
    }

    /// The scene at `index`.
    #[must_use]
    pub fn scene(&self, index: u32) -> Option<&Scene> {
        self.scenes.get(index as usize)
    }

    /// Returns `true` if `selection` equals the correct set exactly.
    #[must_use]
    pub fn is_correct_selection(&self, selection: &BTreeSet<usize>) -> bool {
        &self.correct == selection
    }
}

/// A single exercise.
#[derive(Clone)]
pub struct Scene {
    /// Question revealed once the scene's timer gate opens.
    pub question: String,
    /// Optional backdrop asset.
    pub backdrop: Option<String>,
    factory: SceneFactory,
    predicate: ScenePredicate,
}

impl Scene {
    /// Creates a scene from a widget factory and a correctness predicate.
    pub fn new(question: impl Into<String>, factory: SceneFactory, predicate: ScenePredicate) -> Self {
        Self {
            question: question.into(),
            backdrop: None,
            factory,
            predicate,
        }
    }

    /// Sets the backdrop asset.
    #[must_use]
    pub fn with_backdrop(mut self, backdrop: impl Into<String>) -> Self {
        self.backdrop = Some(backdrop.into());
        self
    }

    /// Builds a fresh widget list for a new visit.
    #[must_use]
    pub fn instantiate(&self) -> Vec<Widget> {
        (self.factory)()
    }

    /// Evaluates the predicate against the live widget list.
    #[must_use]
    pub fn is_solved(&self, widgets: &[Widget]) -> bool {
        (self.predicate)(widgets)
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("question", &self.question)
            .field("backdrop", &self.backdrop)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_core::geometry::Point;
    use casebook_ui::Component;
    use casebook_ui::widgets::Choice;

    fn choice_scene() -> Scene {
        let factory: SceneFactory = Arc::new(|| {
            vec![Widget::from(
                Choice::new(
                    Rect::new(0.0, 0.0, 100.0, 100.0),
                    vec!["yes".to_owned(), "no".to_owned()],
                )
                .with_answer(0),
            )]
        });
        let predicate: ScenePredicate =
            Arc::new(|widgets| widgets.iter().all(|w| w.is_correct() != Some(false)));
        Scene::new("Is it?", factory, predicate)
    }

    #[test]
    fn test_instantiate_returns_fresh_widgets_each_visit() {
        // Arrange
        let scene = choice_scene();
        let mut first = scene.instantiate();

        // Act
        first[0].click(Point::new(10.0, 10.0));
        let second = scene.instantiate();

        // Assert
        assert!(scene.is_solved(&first));
        assert!(!scene.is_solved(&second));
    }
}
