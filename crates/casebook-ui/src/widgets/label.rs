use casebook_core::geometry::Rect;
use serde_json::json;

use crate::component::{Component, DrawContext};
use crate::render::{DrawOp, Tone};

/// Static text.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Layout box.
    pub bounds: Rect,
    /// Text content.
    pub text: String,
    /// Text emphasis.
    pub tone: Tone,
}

impl Label {
    /// Creates a label with normal emphasis.
    pub fn new(bounds: Rect, text: impl Into<String>) -> Self {
        Self {
            bounds,
            text: text.into(),
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

impl Component for Label {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, _ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        ops.push(DrawOp::Text {
            rect: self.bounds,
            text: self.text.clone(),
            tone: self.tone,
        });
    }

    fn summary(&self) -> serde_json::Value {
        json!({ "kind": "label" })
    }
}

/// A static image asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    /// Target area.
    pub bounds: Rect,
    /// Asset key.
    pub asset: String,
}

impl Picture {
    /// Creates a picture.
    pub fn new(bounds: Rect, asset: impl Into<String>) -> Self {
        Self {
            bounds,
            asset: asset.into(),
        }
    }
}

impl Component for Picture {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, _ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        ops.push(DrawOp::Image {
            rect: self.bounds,
            asset: self.asset.clone(),
        });
    }

    fn summary(&self) -> serde_json::Value {
        json!({ "kind": "picture", "asset": self.asset })
    }
}
