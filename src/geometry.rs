//! 2D geometry primitives shared by the generator and the queries

use glam::DVec2;

/// A point in map space
pub type Point = DVec2;

/// Linear interpolation between two points
///
/// `t = 0` yields `a`, `t = 1` yields `b`.
#[inline]
pub fn interpolate(a: Point, b: Point, t: f64) -> Point {
    a.lerp(b, t)
}

/// Exact bit-pattern key of a point, usable in hash maps
///
/// `-0.0` is folded onto `0.0` so the two compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey(u64, u64);

impl From<Point> for PointKey {
    fn from(p: Point) -> Self {
        PointKey((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
    }
}

/// The square `[0, size]²` the map lives in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Side length
    pub size: f64,
}

impl Bounds {
    /// Square with the given side length anchored at the origin
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    /// Center of the square
    #[inline]
    pub fn center(&self) -> Point {
        Point::splat(self.size * 0.5)
    }

    /// Whether `p` lies inside or on the square
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.size && p.y <= self.size
    }

    /// Whether `p` lies exactly on one of the four sides
    #[inline]
    pub fn on_border(&self, p: Point) -> bool {
        p.x == 0.0 || p.y == 0.0 || p.x == self.size || p.y == self.size
    }

    /// Fold an arbitrary world point into `[0, size)` by wrapping each axis
    #[inline]
    pub fn wrap(&self, p: Point) -> Point {
        Point::new(p.x.rem_euclid(self.size), p.y.rem_euclid(self.size))
    }
}
