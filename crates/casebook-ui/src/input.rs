//! Player input events.

use casebook_core::geometry::Point;
use serde::{Deserialize, Serialize};

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Scroll up one line.
    Up,
    /// Scroll down one line.
    Down,
    /// Scroll up one page.
    PageUp,
    /// Scroll down one page.
    PageDown,
    /// Activate the primary control.
    Enter,
    /// Dismiss the topmost overlay.
    Escape,
}

/// A discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Input {
    /// A click at a canvas position.
    Click {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// A wheel scroll over a canvas position.
    Scroll {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
        /// Scroll amount in pixels, positive downwards.
        delta: f32,
    },
    /// A key press.
    Key {
        /// The pressed key.
        key: Key,
    },
}

impl Input {
    /// Convenience constructor for a click.
    #[must_use]
    pub fn click(at: Point) -> Self {
        Self::Click { x: at.x, y: at.y }
    }

    /// The canvas position of pointer events.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Click { x, y } | Self::Scroll { x, y, .. } => Some(Point::new(x, y)),
            Self::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_deserializes_from_tagged_json() {
        let click: Input =
            serde_json::from_value(serde_json::json!({ "kind": "click", "x": 3.0, "y": 4.0 }))
                .unwrap();
        let key: Input =
            serde_json::from_value(serde_json::json!({ "kind": "key", "key": "page_down" }))
                .unwrap();

        assert_eq!(click, Input::click(Point::new(3.0, 4.0)));
        assert_eq!(key, Input::Key { key: Key::PageDown });
        assert_eq!(key.position(), None);
    }
}
