//! Island shapes
//!
//! A shape decides which points of the map square are land. The elevation pass
//! queries it once per corner.

use crate::geometry::Point;
use crate::terrain::perlin::{sample_perlin_2d, PerlinConfig};

/// Land/water test over the map square
pub trait IslandShape {
    /// Whether `point` is land
    fn is_land(&self, point: Point) -> bool;
}

impl<F> IslandShape for F
where
    F: Fn(Point) -> bool,
{
    fn is_land(&self, point: Point) -> bool {
        self(point)
    }
}

/// Noise-based island: land where layered Perlin noise beats a radial falloff
///
/// A point at normalized distance `l` from the map center (1 at the middle of
/// each side) is land when its noise value exceeds `0.3 + 0.3 * l²`, so the
/// island thins out toward the edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerlinIslandShape {
    /// Seed for the noise field
    pub seed: u64,
    /// Map side length
    pub size: f64,
    /// Noise configuration
    pub config: PerlinConfig,
}

impl PerlinIslandShape {
    /// Create a shape for a map of side `size`
    pub fn new(seed: u64, size: f64) -> Self {
        Self {
            seed,
            size,
            config: PerlinConfig::default(),
        }
    }

    /// Distance from the center, 1 at the middle of each side
    #[inline]
    fn falloff_distance(&self, point: Point) -> f64 {
        (point / self.size * 2.0 - Point::ONE).length()
    }
}

impl IslandShape for PerlinIslandShape {
    fn is_land(&self, point: Point) -> bool {
        let c = sample_perlin_2d(point, self.size, self.seed, &self.config);
        let l = self.falloff_distance(point);
        c > 0.3 + 0.3 * l * l
    }
}
