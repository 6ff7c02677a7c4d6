//! Hexagonal Lattice Point Distribution
//!
//! Generates the sample sites of an island map: a staggered (hexagonal)
//! lattice of `grid × grid` points inside the square `[0, size]²`.
//!
//! # Algorithm
//!
//! Column `x` and row `y` produce the site
//! - `px = (0.5 + x) / grid * size`
//! - `py = (0.25 + 0.5 * (x % 2) + y) / grid * size`
//!
//! so odd columns are shifted half a cell down, which gives every interior
//! cell six neighbors. Sites are emitted column-major, so the site of column
//! `x` and row `y` has index `grid * x + y`.
//!
//! A small random jitter is added to break the lattice's co-circular
//! degeneracies, which would otherwise produce zero-length Voronoi edges.

use rand::Rng;

use crate::geometry::Point;

/// Jitter strength as fraction of the lattice spacing
///
/// Must stay below 0.25 so that every site remains strictly inside the square
/// and inside its own lattice cell.
const JITTER_STRENGTH: f64 = 0.1;

/// Generate the jittered hexagonal lattice
///
/// # Arguments
///
/// * `grid` - Number of columns and rows
/// * `size` - Side length of the map square
/// * `rng` - Random stream used for jitter
///
/// # Returns
///
/// `grid * grid` points, column-major
///
/// # Example
///
/// ```rust
/// use island_mapgen::generation::generate_hexagon_points;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let points = generate_hexagon_points(16, 64.0, &mut rng);
/// assert_eq!(points.len(), 256);
/// ```
pub fn generate_hexagon_points<R: Rng + ?Sized>(grid: usize, size: f64, rng: &mut R) -> Vec<Point> {
    let mut points = Vec::with_capacity(grid * grid);
    if grid == 0 {
        return points;
    }

    let n = grid as f64;
    for x in 0..grid {
        let stagger = if x % 2 == 1 { 0.5 } else { 0.0 };
        for y in 0..grid {
            let jx = rng.gen_range(-JITTER_STRENGTH..=JITTER_STRENGTH);
            let jy = rng.gen_range(-JITTER_STRENGTH..=JITTER_STRENGTH);
            points.push(Point::new(
                (0.5 + x as f64 + jx) / n * size,
                (0.25 + stagger + y as f64 + jy) / n * size,
            ));
        }
    }

    points
}
