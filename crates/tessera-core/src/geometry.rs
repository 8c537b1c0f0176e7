//! Geometric primitives for diagram layout and positioning.
//!
//! This module provides the small set of geometric types used throughout
//! Tessera for calculating positions, sizes, and bounding boxes of nodes.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Tessera uses a coordinate system consistent with SVG and video frames:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the canvas at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use tessera_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let half = p1.scale(0.5);
/// assert_eq!(half.x(), 5.0);
/// assert_eq!(half.y(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the Euclidean length of the point seen as a vector
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the vector scaled down so its length is at most `max_length`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tessera_core::geometry::Point;
    /// let v = Point::new(30.0, 40.0).clamp_length(10.0);
    /// assert!((v.hypot() - 10.0).abs() < 1e-4);
    /// assert!((v.x() - 6.0).abs() < 1e-4);
    /// ```
    pub fn clamp_length(self, max_length: f32) -> Self {
        let length = self.hypot();
        if length > max_length && length > 0.0 {
            self.scale(max_length / length)
        } else {
            self
        }
    }

    /// Returns true if both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Grows the bounds by `amount` on every side.
    ///
    /// A negative amount shrinks the bounds.
    pub fn expand(self, amount: f32) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    /// Returns the overlapping extent along each axis, or `None` when the
    /// bounds do not overlap by more than `tolerance` on both axes.
    ///
    /// Bounds that merely touch are not considered overlapping.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tessera_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    /// let b = Bounds::new_from_top_left(Point::new(8.0, 5.0), Size::new(10.0, 10.0));
    /// let c = Bounds::new_from_top_left(Point::new(10.0, 0.0), Size::new(10.0, 10.0));
    ///
    /// assert_eq!(a.intersection_extent(&b, 0.0), Some(Size::new(2.0, 5.0)));
    /// assert_eq!(a.intersection_extent(&c, 0.0), None);
    /// ```
    pub fn intersection_extent(&self, other: &Self, tolerance: f32) -> Option<Size> {
        let overlap_x = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let overlap_y = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        (overlap_x > tolerance && overlap_y > tolerance).then(|| Size::new(overlap_x, overlap_y))
    }

    /// Returns true when the two bounds overlap by more than `tolerance`
    pub fn intersects(&self, other: &Self, tolerance: f32) -> bool {
        self.intersection_extent(other, tolerance).is_some()
    }

    /// Merges two bounds to create a larger bounds that contains both.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns true if `other` lies completely inside these bounds
    pub fn contains(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0).prop_map(
            |(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)),
        )
    }

    /// Intersection is symmetric.
    fn check_intersection_symmetric(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.intersects(&b, 0.0), b.intersects(&a, 0.0));
        Ok(())
    }

    /// A merged bounds contains both inputs.
    fn check_merge_contains_inputs(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        let merged = a.merge(&b);
        prop_assert!(merged.contains(&a));
        prop_assert!(merged.contains(&b));
        Ok(())
    }

    proptest! {
        #[test]
        fn intersection_symmetric(a in bounds_strategy(), b in bounds_strategy()) {
            check_intersection_symmetric(a, b)?;
        }

        #[test]
        fn merge_contains_inputs(a in bounds_strategy(), b in bounds_strategy()) {
            check_merge_contains_inputs(a, b)?;
        }
    }
}
