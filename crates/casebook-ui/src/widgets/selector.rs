use std::collections::BTreeSet;

use casebook_core::geometry::{Point, Rect};
use serde_json::json;

use crate::component::{Component, DrawContext, Interaction};
use crate::render::{DrawOp, Tone};

/// A set of toggleable slots laid over a picture.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// Area covering every slot.
    pub bounds: Rect,
    slots: Vec<Rect>,
    selected: BTreeSet<usize>,
    expected: Option<BTreeSet<usize>>,
}

impl Selector {
    /// Creates a selector with the given slot regions and nothing selected.
    #[must_use]
    pub fn new(bounds: Rect, slots: Vec<Rect>) -> Self {
        Self {
            bounds,
            slots,
            selected: BTreeSet::new(),
            expected: None,
        }
    }

    /// Attaches the expected selection, enabling [`Component::is_correct`].
    #[must_use]
    pub fn expecting(mut self, expected: BTreeSet<usize>) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Slot regions in index order.
    #[must_use]
    pub fn slots(&self) -> &[Rect] {
        &self.slots
    }

    /// Currently selected slot indices.
    #[must_use]
    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Toggles slot `index`. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.slots.len() {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    /// Returns `true` if the selection equals `expected` exactly.
    #[must_use]
    pub fn matches(&self, expected: &BTreeSet<usize>) -> bool {
        &self.selected == expected
    }
}

impl Component for Selector {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, _ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        for (index, slot) in self.slots.iter().enumerate() {
            let tone = if self.selected.contains(&index) {
                Tone::Selected
            } else {
                Tone::Muted
            };
            ops.push(DrawOp::Outline { rect: *slot, tone });
        }
    }

    fn summary(&self) -> serde_json::Value {
        json!({ "kind": "selector", "selected": self.selected })
    }

    fn is_correct(&self) -> Option<bool> {
        self.expected.as_ref().map(|expected| self.matches(expected))
    }

    fn click(&mut self, at: Point) -> Interaction {
        match self.slots.iter().position(|slot| slot.contains(at)) {
            Some(index) => {
                self.toggle(index);
                Interaction::Changed
            }
            None => Interaction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nine_slots() -> Selector {
        let bounds = Rect::new(0.0, 0.0, 90.0, 90.0);
        Selector::new(bounds, bounds.grid(3, 3))
    }

    #[test]
    fn test_click_toggles_slot_under_pointer() {
        let mut selector = nine_slots();

        assert_eq!(selector.click(Point::new(45.0, 15.0)), Interaction::Changed);
        assert_eq!(selector.selection(), &BTreeSet::from([1]));
        selector.click(Point::new(45.0, 15.0));
        assert!(selector.selection().is_empty());
    }

    #[test]
    fn test_matches_requires_exact_set_equality() {
        let expected = BTreeSet::from([2, 5, 8]);
        let mut selector = nine_slots().expecting(expected.clone());

        selector.toggle(2);
        selector.toggle(5);
        assert!(!selector.matches(&expected));
        assert_eq!(selector.is_correct(), Some(false));

        selector.toggle(8);
        assert!(selector.matches(&expected));

        selector.toggle(1);
        assert!(!selector.matches(&expected));
    }
}
