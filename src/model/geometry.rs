//! Axis-aligned bounding boxes in page pixel coordinates.

use serde::{Deserialize, Serialize};

/// A rectangle on the page image.
///
/// Width and height are never negative: constructors and [`shrink`](Self::shrink)
/// clamp at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl BoundingBox {
    /// Create a bounding box, clamping negative dimensions to zero.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Create from the `[x, y, width, height]` form used in layout records.
    pub fn from_array(values: [i32; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// The `[x, y, width, height]` form used in layout records.
    pub fn to_array(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Area in square pixels.
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Check whether the box has zero width or height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grow the box by `amount` on all four sides.
    pub fn expand(&mut self, amount: i32) {
        self.x -= amount;
        self.y -= amount;
        self.width += 2 * amount;
        self.height += 2 * amount;
        self.width = self.width.max(0);
        self.height = self.height.max(0);
    }

    /// Shrink the box by `amount` on all four sides.
    ///
    /// An axis that would go negative collapses to zero size around its centre.
    pub fn shrink(&mut self, amount: i32) {
        if amount < 0 {
            self.expand(-amount);
            return;
        }

        if 2 * amount <= self.width {
            self.x += amount;
            self.width -= 2 * amount;
        } else {
            self.x += self.width / 2;
            self.width = 0;
        }

        if 2 * amount <= self.height {
            self.y += amount;
            self.height -= 2 * amount;
        } else {
            self.y += self.height / 2;
            self.height = 0;
        }
    }

    /// Check whether `other` lies fully inside this box (edges inclusive).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Check whether the interiors of the two boxes overlap.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// Ranking score of how closely `other` matches this box.
    ///
    /// `1 - (|dx| + |dy| + |dw| + |dh|) / (width + height)`, relative to the
    /// receiver. Very dissimilar boxes score below zero.
    pub fn similarity(&self, other: &BoundingBox) -> f64 {
        let distance = (i64::from(self.x) - i64::from(other.x)).abs()
            + (i64::from(self.y) - i64::from(other.y)).abs()
            + (i64::from(self.width) - i64::from(other.width)).abs()
            + (i64::from(self.height) - i64::from(other.height)).abs();
        let extent = i64::from(self.width) + i64::from(self.height);

        if extent == 0 {
            return if distance == 0 { 1.0 } else { f64::NEG_INFINITY };
        }

        1.0 - distance as f64 / extent as f64
    }
}
