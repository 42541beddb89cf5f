//! Content fixtures — in-memory courses and a resolver that serves them.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use casebook_content::application::resolver::ContentResolver;
use casebook_content::domain::model::{
    Course, Level, ReadingPaper, Scene, SceneFactory, ScenePredicate, Session, SessionDescriptor,
    SessionEntry,
};
use casebook_core::error::DomainError;
use casebook_core::geometry::{Point, Rect};
use casebook_ui::widgets::{Choice, PaperBlock};
use casebook_ui::{Component, Widget};

/// Where every fixture scene places its choice.
pub const CHOICE_BOUNDS: Rect = Rect {
    x: 140.0,
    y: 200.0,
    width: 600.0,
    height: 200.0,
};

/// Click target of the correct option of a fixture scene.
pub const RIGHT_ANSWER: Point = Point { x: 440.0, y: 250.0 };

/// Click target of the wrong option of a fixture scene.
pub const WRONG_ANSWER: Point = Point { x: 440.0, y: 350.0 };

/// A scene with one two-option choice; the first option is correct.
#[must_use]
pub fn choice_scene(question: &str) -> Scene {
    let factory: SceneFactory = Arc::new(|| {
        vec![Widget::from(
            Choice::new(CHOICE_BOUNDS, vec!["right".to_owned(), "wrong".to_owned()])
                .with_answer(0),
        )]
    });
    let predicate: ScenePredicate =
        Arc::new(|widgets| widgets.iter().any(|w| w.is_correct() == Some(true)));
    Scene::new(question, factory, predicate)
}

/// A level with `scene_count` choice scenes, a one-paragraph paper and the
/// correct selection `{2, 5, 8}` over the default 3x3 grid.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn level_fixture(index: u32, scene_count: u32) -> Level {
    Level {
        title: format!("Level {index}"),
        marker: Rect::new(100.0 + 150.0 * index as f32, 500.0, 80.0, 80.0),
        paper: ReadingPaper {
            title: format!("Notes {index}"),
            blocks: vec![PaperBlock::Paragraph("Read carefully.".to_owned())],
        },
        prompt: "Select the clues.".to_owned(),
        picture: "rooms/fixture.png".to_owned(),
        slots: Rect::new(240.0, 120.0, 800.0, 480.0).grid(3, 3),
        correct: BTreeSet::from([2, 5, 8]),
        scenes: (0..scene_count)
            .map(|scene| choice_scene(&format!("Question {index}.{scene}")))
            .collect(),
    }
}

/// A course built from scene counts: `shape[session][level]` scenes.
#[derive(Debug, Clone)]
pub struct CourseFixture {
    /// The course map.
    pub course: Course,
    /// Resolved sessions in course order.
    pub sessions: Vec<Session>,
}

impl CourseFixture {
    /// Builds the fixture.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn new(shape: &[&[u32]]) -> Self {
        let sessions: Vec<Session> = shape
            .iter()
            .enumerate()
            .map(|(s, levels)| Session {
                title: format!("Session {s}"),
                background: None,
                levels: levels
                    .iter()
                    .enumerate()
                    .map(|(l, scenes)| level_fixture(l as u32, *scenes))
                    .collect(),
            })
            .collect();
        let course = Course {
            title: "Fixture course".to_owned(),
            sessions: (0..sessions.len())
                .map(|s| SessionEntry {
                    title: format!("Session {s}"),
                    marker: Rect::new(100.0 + 200.0 * s as f32, 300.0, 80.0, 80.0),
                    descriptor: SessionDescriptor(format!("session-{s}")),
                })
                .collect(),
        };
        Self { course, sessions }
    }

    /// Replaces every paper with one long enough to need scrolling.
    #[must_use]
    pub fn with_long_papers(mut self) -> Self {
        let blocks: Vec<PaperBlock> = (0..120)
            .map(|i| PaperBlock::Paragraph(format!("Paragraph {i} of the case file.")))
            .collect();
        for session in &mut self.sessions {
            for level in &mut session.levels {
                level.paper.blocks.clone_from(&blocks);
            }
        }
        self
    }

    /// Center of session `index`'s marker.
    ///
    /// # Panics
    ///
    /// Panics if the session does not exist.
    #[must_use]
    pub fn session_marker(&self, index: u32) -> Point {
        self.course.sessions[index as usize].marker.center()
    }

    /// Center of level `level`'s marker in session `session`.
    ///
    /// # Panics
    ///
    /// Panics if the level does not exist.
    #[must_use]
    pub fn level_marker(&self, session: u32, level: u32) -> Point {
        self.sessions[session as usize].levels[level as usize]
            .marker
            .center()
    }

    /// Center of selection slot `slot` in the given level.
    ///
    /// # Panics
    ///
    /// Panics if the level or slot does not exist.
    #[must_use]
    pub fn slot(&self, session: u32, level: u32, slot: usize) -> Point {
        self.sessions[session as usize].levels[level as usize].slots[slot].center()
    }

    /// A resolver serving this fixture's sessions.
    #[must_use]
    pub fn resolver(&self) -> StaticContentResolver {
        StaticContentResolver::new(self.sessions.clone())
    }
}

/// A content resolver over in-memory sessions. Counts calls and can be told
/// to fail for chosen indices.
#[derive(Debug)]
pub struct StaticContentResolver {
    sessions: Vec<Session>,
    broken: HashSet<u32>,
    calls: AtomicU32,
}

impl StaticContentResolver {
    /// Serve `sessions` by index.
    #[must_use]
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions,
            broken: HashSet::new(),
            calls: AtomicU32::new(0),
        }
    }

    /// Make session `index` fail to resolve.
    #[must_use]
    pub fn breaking(mut self, index: u32) -> Self {
        self.broken.insert(index);
        self
    }

    /// Number of `resolve` calls so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentResolver for StaticContentResolver {
    async fn resolve(
        &self,
        index: u32,
        descriptor: &SessionDescriptor,
    ) -> Result<Session, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.contains(&index) {
            return Err(DomainError::InvalidContent(format!(
                "{} is broken",
                descriptor.0
            )));
        }
        self.sessions
            .get(index as usize)
            .cloned()
            .ok_or_else(|| DomainError::ContentNotFound(descriptor.0.clone()))
    }
}
