//! Edge structure

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CornerId, EdgeId, RegionId};
use crate::geometry::Point;

/// One Voronoi edge together with its dual Delaunay edge
///
/// Either side may be missing at the outer boundary of the map.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub index: EdgeId,
    /// Delaunay endpoints (regions)
    pub d0: Option<RegionId>,
    pub d1: Option<RegionId>,
    /// Voronoi endpoints (corners)
    pub v0: Option<CornerId>,
    pub v1: Option<CornerId>,
    /// Midpoint of the Voronoi segment, `None` unless both corners exist
    pub midpoint: Option<Point>,
}

impl Edge {
    /// Create an unlinked edge
    pub fn new(index: EdgeId) -> Self {
        Self {
            index,
            d0: None,
            d1: None,
            v0: None,
            v1: None,
            midpoint: None,
        }
    }

    /// Whether this edge separates the two given regions
    pub fn joins_regions(&self, a: RegionId, b: RegionId) -> bool {
        (self.d0 == Some(a) && self.d1 == Some(b)) || (self.d0 == Some(b) && self.d1 == Some(a))
    }

    /// Whether this edge runs between the two given corners
    pub fn joins_corners(&self, a: CornerId, b: CornerId) -> bool {
        (self.v0 == Some(a) && self.v1 == Some(b)) || (self.v0 == Some(b) && self.v1 == Some(a))
    }
}
