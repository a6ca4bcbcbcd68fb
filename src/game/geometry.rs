//! 2D vectors and canvas bounds.

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector in canvas space (pixels, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a vector from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Unit vector in the same direction, or `None` for a zero or non-finite vector.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// Rescale to `max` if longer than `max`, preserving direction.
    #[must_use]
    pub fn limit(self, max: f64) -> Self {
        let len = self.length();
        if len > max {
            self * (max / len)
        } else {
            self
        }
    }

    /// Rotate by +90 degrees: `(x, y) -> (-y, x)`.
    #[must_use]
    pub const fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Whether both components are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Canvas dimensions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
}

impl Bounds {
    /// Create bounds from a width and height.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the canvas.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a point lies in `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }

    /// Toroidal wrap into `[0, width) x [0, height)`.
    #[must_use]
    pub fn wrap(self, p: Vec2) -> Vec2 {
        Vec2::new(wrap_axis(p.x, self.width), wrap_axis(p.y, self.height))
    }
}

/// Wrap one coordinate into `[0, extent)`.
///
/// A value landing exactly on `extent` (including via rounding in
/// `rem_euclid`) maps to 0.
fn wrap_axis(value: f64, extent: f64) -> f64 {
    if extent.is_nan() || extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_preserves_direction() {
        let v = Vec2::new(30.0, 40.0).limit(5.0);
        assert!((v.x - 3.0).abs() < 1e-12);
        assert!((v.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_limit_leaves_short_vectors() {
        let v = Vec2::new(1.0, 1.0);
        assert_eq!(v.limit(3.5), v);
    }

    #[test]
    fn test_normalized_zero_is_none() {
        assert!(Vec2::ZERO.normalized().is_none());
        assert!(Vec2::new(f64::NAN, 0.0).normalized().is_none());
    }

    #[test]
    fn test_perp() {
        assert_eq!(Vec2::new(1.0, 0.0).perp(), Vec2::new(0.0, 1.0));
        assert_eq!(Vec2::new(0.0, 2.0).perp(), Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_wrap_crossing_edges() {
        let b = Bounds::new(100.0, 50.0);
        assert_eq!(b.wrap(Vec2::new(105.0, 10.0)), Vec2::new(5.0, 10.0));
        assert_eq!(b.wrap(Vec2::new(-5.0, -10.0)), Vec2::new(95.0, 40.0));
    }

    #[test]
    fn test_wrap_exact_edge_maps_to_zero() {
        let b = Bounds::new(100.0, 50.0);
        assert_eq!(b.wrap(Vec2::new(100.0, 50.0)), Vec2::ZERO);
        assert!(b.contains(b.wrap(Vec2::new(-1e-18, -1e-18))));
    }

    #[test]
    fn test_wrap_degenerate_canvas() {
        let b = Bounds::new(0.0, 10.0);
        assert_eq!(b.wrap(Vec2::new(3.0, 3.0)), Vec2::new(0.0, 3.0));
    }
}
