//! Geometric primitives for diagram positioning.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//!
//! # Coordinate System
//!
//! Atlas uses the coordinate system of the document store and the UI canvas:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Node positions refer to the top-left corner of the node's box.

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in diagram coordinate space.
///
/// Serialized as `{"x": .., "y": ..}`, the shape node positions take in the
/// document store.
///
/// # Examples
///
/// ```
/// # use atlas_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    x: f32,
    #[serde(default)]
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

    /// Checks if both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
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
}

/// Width and height of a node's box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Creates a new size with the specified dimensions
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a size with the maximum width and height of both sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns the point at the center of a box of this size placed at the origin
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_point_accessors() {
        let point = Point::new(3.0, -4.0);
        assert_eq!(point.x(), 3.0);
        assert_eq!(point.y(), -4.0);
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f32::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_point_serde_shape() {
        let point: Point = serde_json::from_str(r#"{"x": 12.5, "y": 4}"#).unwrap();
        assert_eq!(point, Point::new(12.5, 4.0));

        let missing_y: Point = serde_json::from_str(r#"{"x": 1}"#).unwrap();
        assert_eq!(missing_y, Point::new(1.0, 0.0));
    }

    #[test]
    fn test_size_max_and_center() {
        let size = Size::new(90.0, 40.0).max(Size::new(60.0, 50.0));
        assert_eq!(size.width(), 90.0);
        assert_eq!(size.height(), 50.0);
        assert_eq!(size.center(), Point::new(45.0, 25.0));
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn check_add_sub_inverse(p1: Point, p2: Point) -> Result<(), TestCaseError> {
        let roundtrip = p1.add_point(p2).sub_point(p2);

        prop_assert!(approx_eq!(f32, roundtrip.x(), p1.x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, roundtrip.y(), p1.y(), epsilon = 0.001));
        Ok(())
    }

    proptest! {
        #[test]
        fn add_sub_inverse(p1 in point_strategy(), p2 in point_strategy()) {
            check_add_sub_inverse(p1, p2)?;
        }
    }
}
