use casebook_core::geometry::Rect;
use serde_json::json;

use crate::component::{Component, DrawContext};
use crate::render::{DrawOp, Tone};

const TITLE_HEIGHT: f32 = 32.0;

/// A framed panel with a title and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    /// Panel area.
    pub bounds: Rect,
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Panel emphasis.
    pub tone: Tone,
}

impl Dialog {
    /// Creates a dialog with normal emphasis.
    pub fn new(bounds: Rect, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            bounds,
            title: title.into(),
            body: body.into(),
            tone: Tone::Normal,
        }
    }

    /// Sets the emphasis.
    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

impl Component for Dialog {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, _ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        let inner = self.bounds.inset(8.0);
        ops.push(DrawOp::Panel {
            rect: self.bounds,
            tone: self.tone,
        });
        ops.push(DrawOp::Outline {
            rect: self.bounds,
            tone: Tone::Accent,
        });
        if !self.title.is_empty() {
            ops.push(DrawOp::Text {
                rect: Rect::new(inner.x, inner.y, inner.width, TITLE_HEIGHT.min(inner.height)),
                text: self.title.clone(),
                tone: Tone::Accent,
            });
        }
        ops.push(DrawOp::Text {
            rect: Rect::new(
                inner.x,
                inner.y + TITLE_HEIGHT,
                inner.width,
                (inner.height - TITLE_HEIGHT).max(0.0),
            ),
            text: self.body.clone(),
            tone: self.tone,
        });
    }

    fn summary(&self) -> serde_json::Value {
        json!({ "kind": "dialog", "title": self.title })
    }
}
