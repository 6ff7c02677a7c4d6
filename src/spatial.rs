//! Spatial indexing for fast point-to-region lookups
//!
//! This module is only available with the `spatial-index` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::Point;

/// KD-tree over region sites
///
/// Built once after generation or loading, then answers exact nearest-site
/// queries in O(log n).
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex").finish_non_exhaustive()
    }
}

impl SpatialIndex {
    /// Build the index from region sites, in region index order
    ///
    /// # Example
    ///
    /// ```
    /// use island_mapgen::*;
    ///
    /// let sites = vec![Point::new(1.0, 1.0), Point::new(9.0, 1.0), Point::new(5.0, 8.0)];
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Point::new(8.0, 2.0)), 1);
    /// ```
    pub fn new(sites: &[Point]) -> Self {
        let points: Vec<[f64; 2]> = sites.iter().map(|p| [p.x, p.y]).collect();
        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Index of the site nearest to `position`
    pub fn find_nearest(&self, position: Point) -> usize {
        let query = [position.x, position.y];
        self.tree.nearest_one::<SquaredEuclidean>(&query).item
    }
}
