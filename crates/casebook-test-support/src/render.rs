//! Test renderer — records every frame and freeze toggle.

use casebook_ui::{DrawOp, Frame, Renderer};

/// A renderer that keeps every frame it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<Frame>,
    frozen: bool,
    freeze_toggles: Vec<bool>,
}

impl RecordingRenderer {
    /// Create an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The most recent frame.
    ///
    /// # Panics
    ///
    /// Panics if nothing was drawn yet.
    #[must_use]
    pub fn last(&self) -> &Frame {
        self.frames.last().expect("no frame drawn")
    }

    /// Every value passed to `set_frozen`, in order.
    #[must_use]
    pub fn freeze_toggles(&self) -> &[bool] {
        &self.freeze_toggles
    }

    /// Texts of the most recent frame in paint order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.frames
            .last()
            .map(|frame| {
                frame
                    .ops
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::Text { text, .. } => Some(text.clone()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns `true` if the most recent frame contains text including
    /// `needle`.
    #[must_use]
    pub fn shows(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text.contains(needle))
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, mut frame: Frame) {
        frame.frozen = self.frozen;
        self.frames.push(frame);
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
        self.freeze_toggles.push(frozen);
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }
}
