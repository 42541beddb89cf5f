use casebook_core::geometry::{Point, Rect};
use serde_json::json;

use crate::component::{Component, DrawContext, Interaction};
use crate::render::{DrawOp, Tone};

/// A clickable control.
///
/// A disabled button still draws but never activates.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    /// Hit area.
    pub bounds: Rect,
    /// Caption text.
    pub caption: String,
    /// Emphasis while enabled.
    pub tone: Tone,
    /// Whether clicks activate the button.
    pub enabled: bool,
    presses: u32,
}

impl Button {
    /// Creates an enabled button.
    pub fn new(bounds: Rect, caption: impl Into<String>) -> Self {
        Self {
            bounds,
            caption: caption.into(),
            tone: Tone::Normal,
            enabled: true,
            presses: 0,
        }
    }

    /// Sets the emphasis.
    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Creates a locked (disabled, muted) button.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.enabled = false;
        self.tone = Tone::Muted;
        self
    }

    /// Disables the button in place.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Number of times the button was activated.
    #[must_use]
    pub fn presses(&self) -> u32 {
        self.presses
    }
}

impl Component for Button {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, _ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        let tone = if self.enabled { self.tone } else { Tone::Muted };
        ops.push(DrawOp::Panel {
            rect: self.bounds,
            tone,
        });
        ops.push(DrawOp::Text {
            rect: self.bounds.inset(4.0),
            text: self.caption.clone(),
            tone,
        });
    }

    fn summary(&self) -> serde_json::Value {
        json!({ "kind": "button", "caption": self.caption, "presses": self.presses })
    }

    fn click(&mut self, _at: Point) -> Interaction {
        if !self.enabled {
            return Interaction::Ignored;
        }
        self.presses += 1;
        Interaction::Activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_button_ignores_clicks() {
        let mut button = Button::new(Rect::new(0.0, 0.0, 10.0, 10.0), "Submit");

        assert_eq!(button.click(Point::new(1.0, 1.0)), Interaction::Activated);
        button.disable();
        assert_eq!(button.click(Point::new(1.0, 1.0)), Interaction::Ignored);
        assert_eq!(button.presses(), 1);
    }
}
