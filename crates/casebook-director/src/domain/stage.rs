//! Stages: the live widgets of a screen and what their activation means.
//!
//! A transition builds a whole [`Stage`]; nothing about a screen survives
//! navigation. Input is hit-tested top-down against the stage's widgets and
//! the activated widget's [`Action`] is handed back to the director.

use std::ops::Range;

use casebook_ui::widgets::{Button, Paper, Selector, Timer};
use casebook_ui::{Component, DrawContext, Frame, Input, Interaction, Key, Widget};

use super::screen::{Overlay, Screen};

/// Something the director does in response to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open a session from the course map.
    OpenSession(u32),
    /// Open a level on the level map.
    OpenLevel {
        /// Session index.
        session: u32,
        /// Level index.
        level: u32,
    },
    /// Confirm the reading.
    FinishReading,
    /// Confirm the object selection.
    ConfirmSelection,
    /// Reveal the scene question.
    RevealQuestion,
    /// Check the scene answer.
    SubmitAnswer,
    /// Close an alert.
    DismissAlert,
    /// Open the menu.
    OpenMenu,
    /// Close the menu.
    CloseMenu,
    /// Menu: go to the course map.
    MenuCourseMap,
    /// Menu: go to the active session's level map.
    MenuLevelMap,
    /// Retry the commit that gave up.
    Reconnect,
}

/// Result of routing one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// A bound widget or the background was activated.
    Action(Action),
    /// A widget changed; the frame is stale.
    Redraw,
    /// Nothing reacted.
    Nothing,
}

/// An ordered widget list with action bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    /// Widgets in draw order.
    pub widgets: Vec<Widget>,
    /// Widgets before this index stop receiving input while frozen.
    pub live_from: usize,
    bindings: Vec<(usize, Action)>,
    /// Action for a click that no widget took.
    pub background: Option<Action>,
    /// Action for `Enter`.
    pub primary: Option<Action>,
    /// Action for `Escape`.
    pub escape: Option<Action>,
}

impl Layer {
    /// Appends a widget, returning its index.
    pub fn push(&mut self, widget: impl Into<Widget>) -> usize {
        self.widgets.push(widget.into());
        self.widgets.len() - 1
    }

    /// Appends a widget that triggers `action` when activated.
    pub fn bind(&mut self, widget: impl Into<Widget>, action: Action) -> usize {
        let index = self.push(widget);
        self.bindings.push((index, action));
        index
    }

    /// Marks everything pushed so far as drawn before the freeze.
    pub fn freeze_below(&mut self) {
        self.live_from = self.widgets.len();
    }

    /// The action bound to widget `index`.
    #[must_use]
    pub fn action_for(&self, index: usize) -> Option<Action> {
        self.bindings
            .iter()
            .find_map(|(bound, action)| (*bound == index).then_some(*action))
    }

    /// The first button bound to `action`.
    pub fn button_mut(&mut self, action: Action) -> Option<&mut Button> {
        let index = self
            .bindings
            .iter()
            .find_map(|(index, bound)| (*bound == action).then_some(*index))?;
        self.widgets.get_mut(index)?.as_button_mut()
    }

    /// The first paper on the layer.
    #[must_use]
    pub fn paper(&self) -> Option<&Paper> {
        self.widgets.iter().find_map(Widget::as_paper)
    }

    /// The first selector on the layer.
    #[must_use]
    pub fn selector(&self) -> Option<&Selector> {
        self.widgets.iter().find_map(Widget::as_selector)
    }

    /// The first timer on the layer.
    #[must_use]
    pub fn timer(&self) -> Option<&Timer> {
        self.widgets.iter().find_map(Widget::as_timer)
    }

    fn first_live(&self, frozen: bool) -> usize {
        if frozen { self.live_from } else { 0 }
    }

    /// Routes `input` to the topmost widget that takes it.
    pub fn route(&mut self, input: Input, frozen: bool) -> Routed {
        let start = self.first_live(frozen);
        match input {
            Input::Click { .. } | Input::Scroll { .. } => {
                let Some(at) = input.position() else {
                    return Routed::Nothing;
                };
                for index in (start..self.widgets.len()).rev() {
                    let widget = &mut self.widgets[index];
                    if !widget.bounds().contains(at) {
                        continue;
                    }
                    let interaction = match input {
                        Input::Scroll { delta, .. } => widget.scroll(delta),
                        _ => widget.click(at),
                    };
                    match interaction {
                        Interaction::Activated => {
                            return self.action_for(index).map_or(Routed::Redraw, Routed::Action);
                        }
                        Interaction::Changed => return Routed::Redraw,
                        Interaction::Ignored => {}
                    }
                }
                match (input, frozen, self.background) {
                    (Input::Click { .. }, false, Some(action)) => Routed::Action(action),
                    _ => Routed::Nothing,
                }
            }
            Input::Key { key: Key::Enter } => self.press_primary(),
            Input::Key { key: Key::Escape } => self.escape.map_or(Routed::Nothing, Routed::Action),
            Input::Key { key } => {
                let mut changed = false;
                for widget in &mut self.widgets[start..] {
                    changed |= widget.key(key) != Interaction::Ignored;
                }
                if changed { Routed::Redraw } else { Routed::Nothing }
            }
        }
    }

    /// `Enter` goes through the primary button so a disabled control stays
    /// inert from the keyboard too.
    fn press_primary(&mut self) -> Routed {
        let Some(action) = self.primary else {
            return Routed::Nothing;
        };
        match self.button_mut(action) {
            Some(button) if !button.enabled => Routed::Nothing,
            Some(button) => {
                let at = button.bounds.center();
                button.click(at);
                Routed::Action(action)
            }
            None => Routed::Action(action),
        }
    }
}

/// The live screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// The state this stage renders.
    pub screen: Screen,
    /// Widgets and bindings.
    pub layer: Layer,
    /// Indices of the scene's own components within the layer.
    pub components: Range<usize>,
}

impl Stage {
    /// An empty stage for `screen`.
    #[must_use]
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            layer: Layer::default(),
            components: 0..0,
        }
    }

    /// The scene components, in authoring order.
    #[must_use]
    pub fn components(&self) -> &[Widget] {
        &self.layer.widgets[self.components.clone()]
    }

    /// Interaction summaries of the scene components.
    #[must_use]
    pub fn summaries(&self) -> Vec<serde_json::Value> {
        self.components().iter().map(Component::summary).collect()
    }
}

/// A modal layer and the overlay state it renders.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStage {
    /// The overlay state.
    pub overlay: Overlay,
    /// Widgets and bindings.
    pub layer: Layer,
}

/// Composes the stage and an optional overlay into one frame.
#[must_use]
pub fn compose(stage: &Stage, overlay: Option<&OverlayStage>, ctx: &DrawContext) -> Frame {
    let overlay_widgets = overlay.map(|o| o.layer.widgets.as_slice()).unwrap_or_default();
    Frame::compose(stage.layer.widgets.iter().chain(overlay_widgets), ctx)
}
