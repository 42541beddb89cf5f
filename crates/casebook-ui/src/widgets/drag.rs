use casebook_core::geometry::{Offset, Point, Rect};
use serde_json::json;

use crate::component::{Component, DrawContext, Interaction};
use crate::render::{DrawOp, Tone};

/// A movable token.
#[derive(Debug, Clone, PartialEq)]
pub struct DragItem {
    /// Caption drawn on the token.
    pub label: String,
    /// Current position.
    pub rect: Rect,
    home: Rect,
}

impl DragItem {
    /// Creates a token resting at `rect`.
    pub fn new(label: impl Into<String>, rect: Rect) -> Self {
        Self {
            label: label.into(),
            rect,
            home: rect,
        }
    }
}

/// Tokens the player moves onto targets: click a token to pick it up, then
/// click a target to drop it.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    /// Area covering tokens and targets.
    pub bounds: Rect,
    items: Vec<DragItem>,
    targets: Vec<Rect>,
    placements: Vec<Option<usize>>,
    held: Option<usize>,
    expected: Option<Vec<usize>>,
}

impl Drag {
    /// Creates the widget with every token at its home position.
    #[must_use]
    pub fn new(bounds: Rect, items: Vec<DragItem>, targets: Vec<Rect>) -> Self {
        let placements = vec![None; items.len()];
        Self {
            bounds,
            items,
            targets,
            placements,
            held: None,
            expected: None,
        }
    }

    /// Attaches the expected target index for every token.
    #[must_use]
    pub fn expecting(mut self, expected: Vec<usize>) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Target index each token currently sits on.
    #[must_use]
    pub fn placements(&self) -> &[Option<usize>] {
        &self.placements
    }

    /// Drops token `item` onto `target`, or back home for `None`.
    pub fn place(&mut self, item: usize, target: Option<usize>) {
        let Some(token) = self.items.get_mut(item) else {
            return;
        };
        let destination = match target.and_then(|t| self.targets.get(t)) {
            Some(rect) => *rect,
            None => token.home,
        };
        let from = token.rect.center();
        let to = destination.center();
        token.rect = token.rect.translate(Offset::new(to.x - from.x, to.y - from.y));
        self.placements[item] = target.filter(|t| *t < self.targets.len());
    }
}

impl Component for Drag {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, _ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        for target in &self.targets {
            ops.push(DrawOp::Outline {
                rect: *target,
                tone: Tone::Muted,
            });
        }
        for (index, item) in self.items.iter().enumerate() {
            let tone = if self.held == Some(index) {
                Tone::Selected
            } else {
                Tone::Normal
            };
            ops.push(DrawOp::Panel {
                rect: item.rect,
                tone,
            });
            ops.push(DrawOp::Text {
                rect: item.rect.inset(2.0),
                text: item.label.clone(),
                tone,
            });
        }
    }

    fn summary(&self) -> serde_json::Value {
        json!({ "kind": "drag", "placements": self.placements })
    }

    fn is_correct(&self) -> Option<bool> {
        let expected = self.expected.as_ref()?;
        Some(
            expected.len() == self.placements.len()
                && expected
                    .iter()
                    .zip(&self.placements)
                    .all(|(want, got)| Some(*want) == *got),
        )
    }

    fn click(&mut self, at: Point) -> Interaction {
        // Tokens sit above targets, so they win the hit test.
        if let Some(index) = self.items.iter().rposition(|item| item.rect.contains(at)) {
            self.held = if self.held == Some(index) {
                None
            } else {
                Some(index)
            };
            return Interaction::Changed;
        }
        let Some(item) = self.held else {
            return Interaction::Ignored;
        };
        let target = self.targets.iter().position(|target| target.contains(at));
        if target.is_none() && !self.bounds.contains(at) {
            return Interaction::Ignored;
        }
        self.place(item, target);
        self.held = None;
        Interaction::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Drag {
        let items = vec![
            DragItem::new("key", Rect::new(0.0, 0.0, 10.0, 10.0)),
            DragItem::new("lamp", Rect::new(20.0, 0.0, 10.0, 10.0)),
        ];
        let targets = vec![
            Rect::new(0.0, 50.0, 20.0, 20.0),
            Rect::new(40.0, 50.0, 20.0, 20.0),
        ];
        Drag::new(Rect::new(0.0, 0.0, 100.0, 100.0), items, targets).expecting(vec![1, 0])
    }

    #[test]
    fn test_pick_then_drop_moves_token_onto_target() {
        // Arrange
        let mut drag = board();

        // Act
        drag.click(Point::new(5.0, 5.0));
        drag.click(Point::new(50.0, 60.0));

        // Assert
        assert_eq!(drag.placements(), &[Some(1), None]);
        assert!(drag.items[0].rect.overlaps(&drag.targets[1]));
    }

    #[test]
    fn test_is_correct_requires_every_token_on_expected_target() {
        let mut drag = board();

        drag.place(0, Some(1));
        assert_eq!(drag.is_correct(), Some(false));
        drag.place(1, Some(0));
        assert_eq!(drag.is_correct(), Some(true));
        drag.place(1, None);
        assert_eq!(drag.is_correct(), Some(false));
    }
}
