//! Fixed screen chrome on the 1280x720 design canvas.

use casebook_core::geometry::{Rect, Scale};

/// Design canvas width.
pub const CANVAS_WIDTH: f32 = 1280.0;
/// Design canvas height.
pub const CANVAS_HEIGHT: f32 = 720.0;

/// Positions of the director's own widgets, scaled to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    scale: Scale,
}

impl Layout {
    /// Creates a layout at `scale`.
    #[must_use]
    pub fn new(scale: Scale) -> Self {
        Self { scale }
    }

    fn rect(self, x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect::scaled(x, y, width, height, self.scale)
    }

    /// The whole canvas.
    #[must_use]
    pub fn canvas(self) -> Rect {
        self.rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Screen title strip.
    #[must_use]
    pub fn title(self) -> Rect {
        self.rect(140.0, 10.0, 1000.0, 40.0)
    }

    /// Menu button, top right on every screen.
    #[must_use]
    pub fn menu_button(self) -> Rect {
        self.rect(1180.0, 10.0, 90.0, 40.0)
    }

    /// Primary action button, bottom right.
    #[must_use]
    pub fn primary_button(self) -> Rect {
        self.rect(940.0, 640.0, 200.0, 60.0)
    }

    /// Countdown display, bottom left.
    #[must_use]
    pub fn timer(self) -> Rect {
        self.rect(140.0, 640.0, 200.0, 60.0)
    }

    /// Hint line next to the countdown.
    #[must_use]
    pub fn hint(self) -> Rect {
        self.rect(360.0, 640.0, 560.0, 60.0)
    }

    /// Reading paper viewport.
    #[must_use]
    pub fn paper(self) -> Rect {
        self.rect(140.0, 60.0, 1000.0, 560.0)
    }

    /// Question dialog shown after the reveal.
    #[must_use]
    pub fn question(self) -> Rect {
        self.rect(140.0, 60.0, 1000.0, 120.0)
    }

    /// Alert and reconnect dialogs.
    #[must_use]
    pub fn alert(self) -> Rect {
        self.rect(340.0, 240.0, 600.0, 220.0)
    }

    /// Button closing an alert.
    #[must_use]
    pub fn alert_button(self) -> Rect {
        self.rect(565.0, 390.0, 150.0, 50.0)
    }

    /// Menu panel.
    #[must_use]
    pub fn menu_panel(self) -> Rect {
        self.rect(440.0, 160.0, 400.0, 400.0)
    }

    /// Menu entries, top to bottom.
    #[must_use]
    pub fn menu_items(self, count: usize) -> Vec<Rect> {
        self.rect(490.0, 220.0, 300.0, 300.0)
            .grid(1, 3)
            .into_iter()
            .take(count)
            .map(|rect| rect.inset(self.scale.apply(10.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_does_not_overlap_primary_controls() {
        let layout = Layout::new(Scale::IDENTITY);

        assert!(!layout.menu_button().overlaps(&layout.title()));
        assert!(!layout.primary_button().overlaps(&layout.paper()));
        assert!(!layout.primary_button().overlaps(&layout.timer()));
        assert!(layout.alert().contains(layout.alert_button().center()));
        for item in layout.menu_items(3) {
            assert!(layout.menu_panel().contains(item.center()));
        }
    }

    #[test]
    fn test_layout_scales_every_rect() {
        let layout = Layout::new(Scale(0.5));

        assert_eq!(layout.canvas(), Rect::new(0.0, 0.0, 640.0, 360.0));
        assert_eq!(layout.menu_button(), Rect::new(590.0, 5.0, 45.0, 20.0));
    }
}
