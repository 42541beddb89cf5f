//! Authored content formats and their compilation into the content tree.
//!
//! Course and session files are YAML. Rectangles are written in design units
//! and scaled once, here, when the tree is built.

use std::collections::BTreeSet;
use std::sync::Arc;

use casebook_core::error::DomainError;
use casebook_core::geometry::{Rect, Scale};
use casebook_ui::Widget;
use casebook_ui::widgets::{Choice, Dialog, Drag, DragItem, Label, Picture, Selector};
use serde::Deserialize;

use super::check::Check;
use super::model::{
    Course, Level, ReadingPaper, SELECTION_SLOTS, Scene, SceneFactory, Session, SessionDescriptor,
    SessionEntry,
};
use super::paper::parse_markdown;

/// Selection area used when a level does not declare one.
pub const DEFAULT_SELECTION_AREA: RectSource = RectSource {
    x: 240.0,
    y: 120.0,
    width: 800.0,
    height: 480.0,
};

/// A rectangle in design units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RectSource {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl RectSource {
    /// Converts to pixels.
    #[must_use]
    pub fn to_rect(self, scale: Scale) -> Rect {
        Rect::scaled(self.x, self.y, self.width, self.height, scale)
    }
}

/// The course file.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseSource {
    /// Course title.
    pub title: String,
    /// Sessions in unlock order.
    pub sessions: Vec<SessionEntrySource>,
}

/// A session's entry on the course map.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionEntrySource {
    /// Session title.
    pub title: String,
    /// Marker position.
    pub marker: RectSource,
    /// Session file, relative to the content root.
    pub source: String,
}

/// A session file.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSource {
    /// Session title.
    pub title: String,
    /// Level map backdrop.
    #[serde(default)]
    pub background: Option<String>,
    /// Levels in unlock order.
    pub levels: Vec<LevelSource>,
}

/// A level definition.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelSource {
    /// Level title.
    pub title: String,
    /// Marker position on the level map.
    pub marker: RectSource,
    /// Reading material.
    pub paper: PaperSource,
    /// Selection screen instruction.
    pub prompt: String,
    /// Selection picture asset.
    pub picture: String,
    /// Area split into the 3x3 selection grid.
    #[serde(default)]
    pub selection_area: Option<RectSource>,
    /// Correct slot indices.
    pub correct: BTreeSet<usize>,
    /// Scenes in play order.
    pub scenes: Vec<SceneSource>,
}

/// Reading material, inline or in a sibling Markdown file.
#[derive(Debug, Clone, Deserialize)]
pub struct PaperSource {
    /// Paper title.
    pub title: String,
    /// Inline Markdown.
    #[serde(default)]
    pub markdown: Option<String>,
    /// Markdown file relative to the session file.
    #[serde(default)]
    pub file: Option<String>,
}

/// A scene definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneSource {
    /// Question text.
    pub question: String,
    /// Backdrop asset.
    #[serde(default)]
    pub backdrop: Option<String>,
    /// Widgets instantiated on every visit.
    pub widgets: Vec<WidgetSource>,
    /// Correctness rule.
    #[serde(default)]
    pub check: Check,
}

/// A token on a drag board.
#[derive(Debug, Clone, Deserialize)]
pub struct DragItemSource {
    /// Caption.
    pub label: String,
    /// Home position.
    pub bounds: RectSource,
}

/// A widget definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetSource {
    /// Static text.
    Label {
        /// Layout box.
        bounds: RectSource,
        /// Text.
        text: String,
    },
    /// Static image.
    Picture {
        /// Target area.
        bounds: RectSource,
        /// Asset key.
        asset: String,
    },
    /// Framed text.
    Dialog {
        /// Panel area.
        bounds: RectSource,
        /// Title.
        title: String,
        /// Body.
        body: String,
    },
    /// Multiple choice.
    Choice {
        /// Option area.
        bounds: RectSource,
        /// Options top to bottom.
        options: Vec<String>,
        /// Correct option.
        #[serde(default)]
        answer: Option<usize>,
    },
    /// Grid of toggleable slots.
    Selector {
        /// Grid area.
        bounds: RectSource,
        /// Grid columns.
        columns: usize,
        /// Grid rows.
        rows: usize,
        /// Correct selection.
        #[serde(default)]
        expected: Option<BTreeSet<usize>>,
    },
    /// Tokens and targets.
    Drag {
        /// Board area.
        bounds: RectSource,
        /// Tokens.
        items: Vec<DragItemSource>,
        /// Target regions.
        targets: Vec<RectSource>,
        /// Expected target per token.
        #[serde(default)]
        expected: Option<Vec<usize>>,
    },
}

impl WidgetSource {
    fn build(&self, scale: Scale) -> Widget {
        match self {
            Self::Label { bounds, text } => Label::new(bounds.to_rect(scale), text.clone()).into(),
            Self::Picture { bounds, asset } => {
                Picture::new(bounds.to_rect(scale), asset.clone()).into()
            }
            Self::Dialog {
                bounds,
                title,
                body,
            } => Dialog::new(bounds.to_rect(scale), title.clone(), body.clone()).into(),
            Self::Choice {
                bounds,
                options,
                answer,
            } => {
                let choice = Choice::new(bounds.to_rect(scale), options.clone());
                match answer {
                    Some(answer) => choice.with_answer(*answer).into(),
                    None => choice.into(),
                }
            }
            Self::Selector {
                bounds,
                columns,
                rows,
                expected,
            } => {
                let area = bounds.to_rect(scale);
                let selector = Selector::new(area, area.grid(*columns, *rows));
                match expected {
                    Some(expected) => selector.expecting(expected.clone()).into(),
                    None => selector.into(),
                }
            }
            Self::Drag {
                bounds,
                items,
                targets,
                expected,
            } => {
                let items = items
                    .iter()
                    .map(|item| DragItem::new(item.label.clone(), item.bounds.to_rect(scale)))
                    .collect();
                let targets = targets.iter().map(|t| t.to_rect(scale)).collect();
                let drag = Drag::new(bounds.to_rect(scale), items, targets);
                match expected {
                    Some(expected) => drag.expecting(expected.clone()).into(),
                    None => drag.into(),
                }
            }
        }
    }
}

/// Parses a course file.
///
/// # Errors
///
/// Returns `DomainError::InvalidContent` if the YAML is malformed.
pub fn parse_course(yaml: &str) -> Result<CourseSource, DomainError> {
    serde_yaml::from_str(yaml)
        .map_err(|e| DomainError::InvalidContent(format!("course parse failed: {e}")))
}

/// Parses a session file.
///
/// # Errors
///
/// Returns `DomainError::InvalidContent` if the YAML is malformed.
pub fn parse_session(yaml: &str) -> Result<SessionSource, DomainError> {
    serde_yaml::from_str(yaml)
        .map_err(|e| DomainError::InvalidContent(format!("session parse failed: {e}")))
}

/// Builds the course map.
///
/// # Errors
///
/// Returns `DomainError::InvalidContent` for a course without sessions.
pub fn compile_course(source: CourseSource, scale: Scale) -> Result<Course, DomainError> {
    if source.sessions.is_empty() {
        return Err(DomainError::InvalidContent(format!(
            "course '{}' has no sessions",
            source.title
        )));
    }
    Ok(Course {
        title: source.title,
        sessions: source
            .sessions
            .into_iter()
            .map(|entry| SessionEntry {
                title: entry.title,
                marker: entry.marker.to_rect(scale),
                descriptor: SessionDescriptor(entry.source),
            })
            .collect(),
    })
}

/// Builds a session.
///
/// Every paper must carry inline Markdown by now; resolvers inline `file`
/// papers before compiling.
///
/// # Errors
///
/// Returns `DomainError::InvalidContent` for empty sessions or levels,
/// selection indices outside the slot grid, papers without Markdown, or
/// checks referencing missing widgets.
pub fn compile_session(source: SessionSource, scale: Scale) -> Result<Session, DomainError> {
    if source.levels.is_empty() {
        return Err(DomainError::InvalidContent(format!(
            "session '{}' has no levels",
            source.title
        )));
    }
    let levels = source
        .levels
        .into_iter()
        .map(|level| compile_level(level, scale))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Session {
        title: source.title,
        background: source.background,
        levels,
    })
}

fn compile_level(source: LevelSource, scale: Scale) -> Result<Level, DomainError> {
    if source.scenes.is_empty() {
        return Err(DomainError::InvalidContent(format!(
            "level '{}' has no scenes",
            source.title
        )));
    }
    if let Some(bad) = source.correct.iter().find(|i| **i >= SELECTION_SLOTS) {
        return Err(DomainError::InvalidContent(format!(
            "level '{}' marks slot {bad} correct but only {SELECTION_SLOTS} slots exist",
            source.title
        )));
    }
    let markdown = source.paper.markdown.ok_or_else(|| {
        DomainError::InvalidContent(format!("level '{}' paper has no content", source.title))
    })?;
    let area = source
        .selection_area
        .unwrap_or(DEFAULT_SELECTION_AREA)
        .to_rect(scale);
    let scenes = source
        .scenes
        .into_iter()
        .map(|scene| compile_scene(scene, scale))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Level {
        title: source.title,
        marker: source.marker.to_rect(scale),
        paper: ReadingPaper {
            title: source.paper.title,
            blocks: parse_markdown(&markdown),
        },
        prompt: source.prompt,
        picture: source.picture,
        slots: area.grid(3, 3),
        correct: source.correct,
        scenes,
    })
}

fn compile_scene(source: SceneSource, scale: Scale) -> Result<Scene, DomainError> {
    source.check.validate(source.widgets.len())?;
    let widgets = source.widgets;
    let factory: SceneFactory =
        Arc::new(move || widgets.iter().map(|widget| widget.build(scale)).collect());
    let scene = Scene::new(source.question, factory, source.check.into_predicate());
    Ok(match source.backdrop {
        Some(backdrop) => scene.with_backdrop(backdrop),
        None => scene,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_core::geometry::Point;
    use casebook_ui::Component;

    const SESSION: &str = r"
title: The Manor
levels:
  - title: The Study
    marker: { x: 100, y: 100, width: 50, height: 50 }
    paper:
      title: Case notes
      markdown: |
        # Study
        The key is under the lamp.
    prompt: Select everything mentioned in the notes.
    picture: rooms/study.png
    correct: [2, 5, 8]
    scenes:
      - question: Where is the key?
        widgets:
          - kind: choice
            bounds: { x: 0, y: 0, width: 100, height: 100 }
            options: [Under the lamp, In the drawer]
            answer: 0
      - question: Match the objects.
        widgets:
          - kind: label
            bounds: { x: 0, y: 0, width: 10, height: 10 }
            text: Drag each token.
          - kind: drag
            bounds: { x: 0, y: 0, width: 200, height: 200 }
            items:
              - { label: key, bounds: { x: 0, y: 0, width: 10, height: 10 } }
            targets:
              - { x: 100, y: 100, width: 20, height: 20 }
        check:
          kind: placement
          widget: 1
          targets: [0]
";

    #[test]
    fn test_compile_session_builds_levels_and_scenes() {
        // Arrange
        let source = parse_session(SESSION).unwrap();

        // Act
        let session = compile_session(source, Scale(2.0)).unwrap();

        // Assert
        let level = session.level(0).unwrap();
        assert_eq!(session.level_count(), 1);
        assert_eq!(level.scene_count(), 2);
        assert_eq!(level.slots.len(), SELECTION_SLOTS);
        assert_eq!(level.marker, Rect::new(200.0, 200.0, 100.0, 100.0));
        assert_eq!(level.correct, BTreeSet::from([2, 5, 8]));
        assert_eq!(level.paper.blocks.len(), 2);
    }

    #[test]
    fn test_compiled_scene_predicate_reads_live_widgets() {
        // Arrange
        let session = compile_session(parse_session(SESSION).unwrap(), Scale::IDENTITY).unwrap();
        let scene = session.level(0).unwrap().scene(0).unwrap();
        let mut widgets = scene.instantiate();
        assert!(!scene.is_solved(&widgets));

        // Act
        widgets[0].click(Point::new(10.0, 10.0));

        // Assert
        assert!(scene.is_solved(&widgets));
    }

    #[test]
    fn test_compile_rejects_out_of_grid_selection() {
        let yaml = SESSION.replace("correct: [2, 5, 8]", "correct: [2, 9]");

        let result = compile_session(parse_session(&yaml).unwrap(), Scale::IDENTITY);

        assert!(matches!(result, Err(DomainError::InvalidContent(_))));
    }

    #[test]
    fn test_compile_rejects_check_on_missing_widget() {
        let yaml = SESSION.replace("widget: 1", "widget: 7");

        let result = compile_session(parse_session(&yaml).unwrap(), Scale::IDENTITY);

        assert!(matches!(result, Err(DomainError::InvalidContent(_))));
    }

    #[test]
    fn test_parse_session_reports_malformed_yaml() {
        assert!(matches!(
            parse_session("title: [unclosed"),
            Err(DomainError::InvalidContent(_))
        ));
    }
}
