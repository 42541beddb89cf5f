//! The closed set of widget kinds.

use casebook_core::geometry::{Point, Rect};

use crate::component::{Component, DrawContext, Interaction};
use crate::input::Key;
use crate::render::DrawOp;
use crate::widgets::{Button, Choice, Dialog, Drag, Label, Paper, Picture, Selector, Timer};

/// Every widget the director can place on a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Static text.
    Label(Label),
    /// Static image.
    Picture(Picture),
    /// Clickable control.
    Button(Button),
    /// Framed text panel.
    Dialog(Dialog),
    /// Countdown gate.
    Timer(Timer),
    /// Toggleable slots.
    Selector(Selector),
    /// Scrollable reading material.
    Paper(Paper),
    /// Multiple choice.
    Choice(Choice),
    /// Tokens dropped onto targets.
    Drag(Drag),
}

macro_rules! dispatch {
    ($self:expr, $w:ident => $body:expr) => {
        match $self {
            Widget::Label($w) => $body,
            Widget::Picture($w) => $body,
            Widget::Button($w) => $body,
            Widget::Dialog($w) => $body,
            Widget::Timer($w) => $body,
            Widget::Selector($w) => $body,
            Widget::Paper($w) => $body,
            Widget::Choice($w) => $body,
            Widget::Drag($w) => $body,
        }
    };
}

impl Component for Widget {
    fn bounds(&self) -> Rect {
        dispatch!(self, w => w.bounds())
    }

    fn draw(&self, ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        dispatch!(self, w => w.draw(ctx, ops));
    }

    fn summary(&self) -> serde_json::Value {
        dispatch!(self, w => w.summary())
    }

    fn is_correct(&self) -> Option<bool> {
        dispatch!(self, w => w.is_correct())
    }

    fn click(&mut self, at: Point) -> Interaction {
        dispatch!(self, w => w.click(at))
    }

    fn scroll(&mut self, delta: f32) -> Interaction {
        dispatch!(self, w => w.scroll(delta))
    }

    fn key(&mut self, key: Key) -> Interaction {
        dispatch!(self, w => w.key(key))
    }
}

impl Widget {
    /// The paper, if this widget is one.
    #[must_use]
    pub fn as_paper(&self) -> Option<&Paper> {
        match self {
            Self::Paper(paper) => Some(paper),
            _ => None,
        }
    }

    /// The selector, if this widget is one.
    #[must_use]
    pub fn as_selector(&self) -> Option<&Selector> {
        match self {
            Self::Selector(selector) => Some(selector),
            _ => None,
        }
    }

    /// The timer, if this widget is one.
    #[must_use]
    pub fn as_timer(&self) -> Option<&Timer> {
        match self {
            Self::Timer(timer) => Some(timer),
            _ => None,
        }
    }

    /// The button, if this widget is one.
    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Self::Button(button) => Some(button),
            _ => None,
        }
    }

    /// The choice, if this widget is one.
    #[must_use]
    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            Self::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    /// The drag board, if this widget is one.
    #[must_use]
    pub fn as_drag(&self) -> Option<&Drag> {
        match self {
            Self::Drag(drag) => Some(drag),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for Widget {
                fn from(widget: $kind) -> Self {
                    Self::$kind(widget)
                }
            }
        )*
    };
}

impl_from!(Label, Picture, Button, Dialog, Timer, Selector, Paper, Choice, Drag);
