use casebook_core::geometry::{Point, Rect};
use serde_json::json;

use crate::component::{Component, DrawContext, Interaction};
use crate::input::Key;
use crate::render::{DrawOp, Tone};

/// A structural block of reading material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperBlock {
    /// A section heading.
    Heading(String),
    /// A paragraph of running text.
    Paragraph(String),
    /// A list item.
    Item(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    tone: Tone,
}

/// Scrollable reading material.
///
/// The paper remembers the furthest line the reader has had on screen, so
/// [`Paper::reached_end`] stays true after scrolling back up.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    /// Viewport.
    pub bounds: Rect,
    title: String,
    lines: Vec<Line>,
    line_height: f32,
    top: usize,
    furthest_seen: usize,
}

impl Paper {
    /// Lays out `blocks` for a viewport of `bounds` with the given line height.
    #[must_use]
    pub fn new(bounds: Rect, title: impl Into<String>, blocks: &[PaperBlock], line_height: f32) -> Self {
        let line_height = line_height.max(1.0);
        let columns = columns_for(bounds.width, line_height);
        let mut lines = Vec::new();
        for block in blocks {
            let (text, tone, prefix) = match block {
                PaperBlock::Heading(text) => (text, Tone::Accent, ""),
                PaperBlock::Paragraph(text) => (text, Tone::Normal, ""),
                PaperBlock::Item(text) => (text, Tone::Normal, "- "),
            };
            for (i, wrapped) in wrap(text, columns.saturating_sub(prefix.len()).max(1))
                .into_iter()
                .enumerate()
            {
                let lead = match (prefix.is_empty(), i) {
                    (true, _) => "",
                    (false, 0) => prefix,
                    (false, _) => "  ",
                };
                lines.push(Line {
                    text: format!("{lead}{wrapped}"),
                    tone,
                });
            }
            lines.push(Line {
                text: String::new(),
                tone: Tone::Normal,
            });
        }
        if lines.last().is_some_and(|line| line.text.is_empty()) {
            lines.pop();
        }

        let mut paper = Self {
            bounds,
            title: title.into(),
            lines,
            line_height,
            top: 0,
            furthest_seen: 0,
        };
        paper.furthest_seen = paper.visible_lines().min(paper.lines.len());
        paper
    }

    /// Number of lines that fit in the viewport.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn visible_lines(&self) -> usize {
        ((self.bounds.height / self.line_height).floor() as usize).max(1)
    }

    /// Total laid-out lines.
    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` once the last line has been on screen.
    #[must_use]
    pub fn reached_end(&self) -> bool {
        self.furthest_seen >= self.lines.len()
    }

    /// Scrolls by `delta` lines, clamped to the content.
    pub fn scroll_lines(&mut self, delta: isize) {
        let max_top = self.lines.len().saturating_sub(self.visible_lines());
        self.top = self.top.saturating_add_signed(delta).min(max_top);
        let bottom = (self.top + self.visible_lines()).min(self.lines.len());
        self.furthest_seen = self.furthest_seen.max(bottom);
    }

    #[allow(clippy::cast_possible_wrap)]
    fn page(&self) -> isize {
        self.visible_lines().saturating_sub(1).max(1) as isize
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn columns_for(width: f32, line_height: f32) -> usize {
    // Glyphs are assumed to be about half as wide as a line is tall.
    ((width / (line_height * 0.5)).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word = word.to_owned();
        while word.chars().count() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let split: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            out.push(split);
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

impl Component for Paper {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw(&self, _ctx: &DrawContext, ops: &mut Vec<DrawOp>) {
        ops.push(DrawOp::Panel {
            rect: self.bounds,
            tone: Tone::Normal,
        });
        let end = (self.top + self.visible_lines()).min(self.lines.len());
        for (row, line) in self.lines[self.top..end].iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            ops.push(DrawOp::Text {
                rect: Rect::new(
                    self.bounds.x,
                    self.bounds.y + row as f32 * self.line_height,
                    self.bounds.width,
                    self.line_height,
                ),
                text: line.text.clone(),
                tone: line.tone,
            });
        }
    }

    fn summary(&self) -> serde_json::Value {
        json!({
            "kind": "paper",
            "title": self.title,
            "reached_end": self.reached_end(),
            "furthest_line": self.furthest_seen,
            "total_lines": self.lines.len(),
        })
    }

    fn click(&mut self, at: Point) -> Interaction {
        if at.y >= self.bounds.center().y {
            self.scroll_lines(self.page());
        } else {
            self.scroll_lines(-self.page());
        }
        Interaction::Changed
    }

    #[allow(clippy::cast_possible_truncation)]
    fn scroll(&mut self, delta: f32) -> Interaction {
        if delta.abs() < f32::EPSILON {
            return Interaction::Ignored;
        }
        let mut lines = (delta / self.line_height).round() as isize;
        if lines == 0 {
            lines = if delta > 0.0 { 1 } else { -1 };
        }
        self.scroll_lines(lines);
        Interaction::Changed
    }

    fn key(&mut self, key: Key) -> Interaction {
        let delta = match key {
            Key::Up => -1,
            Key::Down => 1,
            Key::PageUp => -self.page(),
            Key::PageDown => self.page(),
            Key::Enter | Key::Escape => return Interaction::Ignored,
        };
        self.scroll_lines(delta);
        Interaction::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(count: usize) -> Vec<PaperBlock> {
        (0..count)
            .map(|i| PaperBlock::Paragraph(format!("paragraph {i}")))
            .collect()
    }

    #[test]
    fn test_wrap_breaks_on_word_boundaries() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 4), vec![""]);
    }

    #[test]
    fn test_short_paper_is_read_immediately() {
        let paper = Paper::new(Rect::new(0.0, 0.0, 400.0, 400.0), "t", &paragraphs(2), 20.0);

        assert!(paper.reached_end());
    }

    #[test]
    fn test_long_paper_requires_scrolling_to_the_end() {
        // Arrange: 20 paragraphs plus separators, 5 visible lines.
        let mut paper = Paper::new(Rect::new(0.0, 0.0, 400.0, 100.0), "t", &paragraphs(20), 20.0);
        assert_eq!(paper.visible_lines(), 5);
        assert!(!paper.reached_end());

        // Act
        while !paper.reached_end() {
            paper.key(Key::PageDown);
        }
        paper.key(Key::PageUp);

        // Assert
        assert!(paper.reached_end());
        assert_eq!(paper.summary()["reached_end"], true);
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let mut paper = Paper::new(Rect::new(0.0, 0.0, 400.0, 100.0), "t", &paragraphs(20), 20.0);

        paper.scroll_lines(-10);
        assert_eq!(paper.top, 0);
        paper.scroll_lines(1_000);
        assert_eq!(paper.top, paper.total_lines() - paper.visible_lines());
    }
}
