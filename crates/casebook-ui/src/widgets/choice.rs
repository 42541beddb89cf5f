use casebook_core::geometry::{Point, Rect};
use serde_json::json;

use crate::component::{Component, DrawContext, Interaction};
use crate::render::{DrawOp, Tone};

/// A single-answer multiple choice, options stacked vertically.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Area covering every option.
    pub bounds: Rect,
    options: Vec<String>,
    picked: Option<usize>,
    answer: Option<usize>,
}

impl Choice {
    /// Creates a choice with nothing picked.
    #[must_use]
    pub fn new(bounds: Rect, options: Vec<String>) -> Self {
        Self {
            bounds,
            options,
            picked: None,
            answer: None,
        }
    }

    /// Attaches the correct option index.
    #[must_use]
    pub fn with_answer(mut self, answer: usize) -> Self {
        self.answer = Some(answer);
        self
    }

    /// The picked option, if any.
    #[must_use]
    pub fn picked(&self) -> Option<usize> {
        self.picked
    }

    /// Picks option `index`. Out-of-range indices are ignored.
    pub fn pick(&mut self, index: usize) {
        if index < self.options.len() {
            self.picked = Some(index);
        }
    }

    fn option_rects(&self) -> Vec<Rect> {
        self.bounds.grid(1, self.options.len())
    }
}

impl Component for Choice {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, _ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        for (index, (rect, option)) in self.option_rects().into_iter().zip(&self.options).enumerate() {
            let tone = if self.picked == Some(index) {
                Tone::Selected
            } else {
                Tone::Normal
            };
            ops.push(DrawOp::Outline { rect, tone });
            ops.push(DrawOp::Text {
                rect: rect.inset(4.0),
                text: option.clone(),
                tone,
            });
        }
    }

    fn summary(&self) -> serde_json::Value {
        json!({ "kind": "choice", "picked": self.picked })
    }

    fn is_correct(&self) -> Option<bool> {
        self.answer.map(|answer| self.picked == Some(answer))
    }

    fn click(&mut self, at: Point) -> Interaction {
        match self.option_rects().iter().position(|rect| rect.contains(at)) {
            Some(index) => {
                self.pick(index);
                Interaction::Changed
            }
            None => Interaction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_picks_option_row() {
        let options = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let mut choice = Choice::new(Rect::new(0.0, 0.0, 100.0, 90.0), options).with_answer(2);

        assert_eq!(choice.is_correct(), Some(false));
        choice.click(Point::new(50.0, 45.0));
        assert_eq!(choice.picked(), Some(1));
        choice.click(Point::new(50.0, 80.0));
        assert_eq!(choice.is_correct(), Some(true));
    }
}
