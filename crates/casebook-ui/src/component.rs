//! The capability contract every widget implements.

use casebook_core::geometry::{Point, Rect};
use chrono::{DateTime, Utc};

use crate::input::Key;
use crate::render::DrawOp;

/// Per-frame information available while drawing.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext {
    /// The time the frame is composed at.
    pub now: DateTime<Utc>,
}

/// What a component did with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// The event was not for this component.
    Ignored,
    /// The component changed its interaction state.
    Changed,
    /// The component was activated (e.g. a button press).
    Activated,
}

/// A visual unit the director can place on a screen.
pub trait Component {
    /// Hit-test region.
    fn bounds(&self) -> Rect;

    /// Resolves the component into draw operations appended to `ops`.
    fn draw(&self, ctx: &DrawContext, ops: &mut Vec<DrawOp>);

    /// Serializable record of the user's interaction with this component.
    fn summary(&self) -> serde_json::Value;

    /// The component's own correctness, if it carries an expected answer.
    fn is_correct(&self) -> Option<bool> {
        None
    }

    /// Handles a click inside [`Component::bounds`].
    fn click(&mut self, _at: Point) -> Interaction {
        Interaction::Ignored
    }

    /// Handles a scroll of `delta` pixels (positive scrolls down).
    fn scroll(&mut self, _delta: f32) -> Interaction {
        Interaction::Ignored
    }

    /// Handles a key press.
    fn key(&mut self, _key: Key) -> Interaction {
        Interaction::Ignored
    }
}
