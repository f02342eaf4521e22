//! Distance and ratio primitives on normalized 2D points.

use serde::{Deserialize, Serialize};

/// A landmark position in normalized image coordinates (origin top-left).
///
/// Detectors also report a depth component; it is accepted on input and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal position, 0.0 at the left edge
    pub x: f64,
    /// Vertical position, 0.0 at the top edge
    pub y: f64,
}

impl Point2D {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points. NaN inputs propagate.
#[must_use]
pub fn distance(p1: Point2D, p2: Point2D) -> f64 {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}

/// Divide two lengths, mapping any non-finite result to NaN.
///
/// A NaN feature fails every threshold comparison, so degenerate landmark
/// sets (coincident points) fall through to the neutral classification.
#[must_use]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    finite_or_nan(numerator / denominator)
}

/// Mean of two values, NaN if either is not finite
#[must_use]
pub fn mean2(a: f64, b: f64) -> f64 {
    finite_or_nan((a + b) / 2.0)
}

/// Replace infinities with NaN
#[must_use]
pub fn finite_or_nan(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        f64::NAN
    }
}
