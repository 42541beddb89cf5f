//! Geometry value types.
//!
//! All coordinates are absolute pixels. Content is authored against a design
//! resolution and multiplied by a single [`Scale`] when rectangles are built.

use serde::{Deserialize, Serialize};

/// Uniform scale factor applied when converting design units to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale(pub f32);

impl Scale {
    /// The identity scale.
    pub const IDENTITY: Self = Self(1.0);

    /// Scales a single design-unit value.
    #[must_use]
    pub fn apply(self, value: f32) -> f32 {
        value * self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A point on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal displacement.
    pub dx: f32,
    /// Vertical displacement.
    pub dy: f32,
}

impl Offset {
    /// Creates a new offset.
    #[must_use]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

/// An axis-aligned rectangle.
///
/// Width and height are expected to be non-negative; this is not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from pixel values.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from design units, applying `scale` to every field.
    #[must_use]
    pub fn scaled(x: f32, y: f32, width: f32, height: f32, scale: Scale) -> Self {
        Self::new(
            scale.apply(x),
            scale.apply(y),
            scale.apply(width),
            scale.apply(height),
        )
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns `true` if `point` lies inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges
    /// exclusive, so adjacent rectangles never both contain a point.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns `true` if the two rectangles share a region of non-zero area.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Offset) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy, self.width, self.height)
    }

    /// Returns a copy shrunk by `amount` on every side.
    ///
    /// Dimensions never go below zero.
    #[must_use]
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }

    /// The smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Splits the rectangle into a `columns` x `rows` grid, row-major.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn grid(&self, columns: usize, rows: usize) -> Vec<Rect> {
        if columns == 0 || rows == 0 {
            return Vec::new();
        }
        let cell_w = self.width / columns as f32;
        let cell_h = self.height / rows as f32;
        (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |col| {
                    Rect::new(
                        self.x + cell_w * col as f32,
                        self.y + cell_h * row as f32,
                        cell_w,
                        cell_h,
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_applies_factor_to_every_field() {
        let rect = Rect::scaled(10.0, 20.0, 30.0, 40.0, Scale(2.0));

        assert_eq!(rect, Rect::new(20.0, 40.0, 60.0, 80.0));
    }

    #[test]
    fn test_union_of_grid_cells_is_the_grid() {
        let area = Rect::new(10.0, 20.0, 90.0, 60.0);

        let covered = area.grid(3, 3).into_iter().reduce(|a, b| a.union(&b)).unwrap();

        assert_eq!(covered, area);
    }

    #[test]
    fn test_contains_is_inclusive_on_top_left_and_exclusive_on_bottom_right() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(9.9, 9.9)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(5.0, 10.0)));
        assert!(!rect.contains(Point::new(-0.1, 5.0)));
    }

    #[test]
    fn test_overlaps_requires_shared_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let crossing = Rect::new(5.0, 5.0, 10.0, 10.0);
        let inside = Rect::new(2.0, 2.0, 2.0, 2.0);

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&crossing));
        assert!(crossing.overlaps(&a));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_translate_and_inset() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);

        assert_eq!(
            rect.translate(Offset::new(5.0, -5.0)),
            Rect::new(15.0, 5.0, 20.0, 20.0)
        );
        assert_eq!(rect.inset(2.0), Rect::new(12.0, 12.0, 16.0, 16.0));
        assert_eq!(rect.inset(50.0).width, 0.0);
    }

    #[test]
    fn test_grid_is_row_major() {
        let cells = Rect::new(0.0, 0.0, 90.0, 90.0).grid(3, 3);

        assert_eq!(cells.len(), 9);
        assert_eq!(cells[1], Rect::new(30.0, 0.0, 30.0, 30.0));
        assert_eq!(cells[3], Rect::new(0.0, 30.0, 30.0, 30.0));
        assert_eq!(cells[8], Rect::new(60.0, 60.0, 30.0, 30.0));
    }
}
