//! Plain geometry primitives used by layout and hit-testing.
//!
//! All coordinates are host coordinates in logical pixels. The functions
//! here are total: degenerate inputs produce empty rectangles instead of
//! errors, because they run on every pointer move.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true if either extent is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle.
///
/// Containment is inclusive on all four edges. A rectangle with a zero or
/// negative extent contains nothing, so "not offered" indicator cells can
/// simply be left as [`Rect::EMPTY`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a rectangle from its origin and extents.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle spanning two corner points.
    ///
    /// The corners may be given in any order.
    #[must_use]
    pub fn from_points(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Creates a rectangle from an origin point and a size.
    #[must_use]
    pub const fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Extents as a [`Size`].
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns true if either extent is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Inclusive containment test. Empty rectangles contain nothing.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Returns a rectangle of `size` centered on this one.
    #[must_use]
    pub fn center_rect(&self, size: Size) -> Self {
        let center = self.center();
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Moves the rectangle by the given offsets.
    #[must_use]
    pub const fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Same origin, new width.
    #[must_use]
    pub const fn with_width(&self, width: f64) -> Self {
        Self::new(self.x, self.y, width, self.height)
    }

    /// Same origin, new height.
    #[must_use]
    pub const fn with_height(&self, height: f64) -> Self {
        Self::new(self.x, self.y, self.width, height)
    }

    /// Smallest rectangle covering both. An empty operand is ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    /// Maps fractional coordinates (0..1 on each axis) to a sub-rectangle.
    #[must_use]
    pub fn lerp_sub(&self, horizontal: (f64, f64), vertical: (f64, f64)) -> Self {
        let lerp = |a: f64, b: f64, t: f64| (1.0 - t).mul_add(a, t * b);
        let left = lerp(self.left(), self.right(), horizontal.0);
        let right = lerp(self.left(), self.right(), horizontal.1);
        let top = lerp(self.top(), self.bottom(), vertical.0);
        let bottom = lerp(self.top(), self.bottom(), vertical.1);
        Self::new(left, top, right - left, bottom - top)
    }
}
