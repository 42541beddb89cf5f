//! Renderer boundary.
//!
//! The director composes a [`Frame`] from an ordered widget list and hands it
//! to a [`Renderer`]. Rendering backends only ever see draw operations; they
//! know nothing about progression.

use casebook_core::geometry::Rect;
use serde::{Deserialize, Serialize};

use crate::component::{Component, DrawContext};
use crate::widget::Widget;

/// Visual emphasis of a draw operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Default appearance.
    Normal,
    /// Greyed out: locked or disabled.
    Muted,
    /// Highlighted chrome.
    Accent,
    /// Attention cue for the next unlocked marker.
    Flashing,
    /// A selected slot or option.
    Selected,
    /// Corrective or fatal messaging.
    Alert,
}

/// A single backend-agnostic draw operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// A filled rectangle.
    Panel {
        /// Area to fill.
        rect: Rect,
        /// Fill emphasis.
        tone: Tone,
    },
    /// A rectangle border.
    Outline {
        /// Area to outline.
        rect: Rect,
        /// Border emphasis.
        tone: Tone,
    },
    /// A run of text laid out inside `rect`.
    Text {
        /// Layout box.
        rect: Rect,
        /// Text content.
        text: String,
        /// Text emphasis.
        tone: Tone,
    },
    /// An image asset stretched over `rect`.
    Image {
        /// Target area.
        rect: Rect,
        /// Asset key understood by the backend.
        asset: String,
    },
}

/// An ordered draw list. Later operations layer above earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Draw operations in paint order.
    pub ops: Vec<DrawOp>,
    /// Whether the renderer was frozen when the frame was drawn.
    pub frozen: bool,
}

impl Frame {
    /// Composes a frame from widgets in draw order.
    pub fn compose<'a>(widgets: impl IntoIterator<Item = &'a Widget>, ctx: &DrawContext) -> Self {
        let mut ops = Vec::new();
        for widget in widgets {
            widget.draw(ctx, &mut ops);
        }
        Self { ops, frozen: false }
    }
}

/// A rendering backend.
pub trait Renderer: Send {
    /// Replaces whatever is on screen with `frame`.
    fn draw(&mut self, frame: Frame);

    /// Enables or disables freeze mode.
    ///
    /// While frozen, everything drawn before the freeze stops receiving
    /// interaction until the freeze is lifted.
    fn set_frozen(&mut self, frozen: bool);

    /// Returns `true` while freeze mode is active.
    fn is_frozen(&self) -> bool;
}

/// A headless renderer that keeps the most recent frame.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    last: Option<Frame>,
    frozen: bool,
    frames_drawn: u64,
}

impl FrameRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently drawn frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl Renderer for FrameRecorder {
    fn draw(&mut self, mut frame: Frame) {
        frame.frozen = self.frozen;
        self.last = Some(frame);
        self.frames_drawn += 1;
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Button, Label};
    use chrono::{TimeZone, Utc};

    fn ctx() -> DrawContext {
        DrawContext {
            now: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_compose_keeps_widget_order() {
        // Arrange
        let label = Widget::from(Label::new(Rect::new(0.0, 0.0, 10.0, 10.0), "first"));
        let button = Widget::from(Button::new(Rect::new(0.0, 0.0, 10.0, 10.0), "second"));

        // Act
        let frame = Frame::compose([&label, &button], &ctx());

        // Assert
        let texts: Vec<&str> = frame
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_frame_recorder_stamps_freeze_state() {
        // Arrange
        let mut recorder = FrameRecorder::new();

        // Act
        recorder.draw(Frame::default());
        recorder.set_frozen(true);
        recorder.draw(Frame::default());

        // Assert
        assert_eq!(recorder.frames_drawn(), 2);
        assert!(recorder.is_frozen());
        assert!(recorder.last_frame().unwrap().frozen);
    }
}
