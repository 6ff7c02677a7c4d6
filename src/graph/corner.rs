//! Corner structure
//!
//! A corner is a Voronoi vertex shared by the regions meeting there.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CornerId, EdgeId, RegionId};
use crate::geometry::Point;

bitflags! {
    /// Water classification of a corner
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CornerFlags: u8 {
        const WATER = 1 << 0;
        const OCEAN = 1 << 1;
        const COAST = 1 << 2;
        /// Lies on the map square
        const BORDER = 1 << 3;
    }
}

/// A Voronoi vertex
///
/// Two corners are the same entity iff their points are within `1e-6` squared
/// distance; the graph builder guarantees this when it creates them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Corner {
    pub index: CornerId,
    pub point: Point,
    /// `f64::MAX` until the elevation pass reaches the corner
    pub elevation: f64,
    pub moisture: f64,
    pub flags: CornerFlags,
    /// Corners joined to this one by a Voronoi edge
    pub adjacent: Vec<CornerId>,
    /// Regions meeting at this corner
    pub touches: Vec<RegionId>,
    /// Edges ending at this corner
    pub protrudes: Vec<EdgeId>,
}

impl Corner {
    /// Create an unlinked corner
    pub fn new(index: CornerId, point: Point) -> Self {
        Self {
            index,
            point,
            elevation: f64::MAX,
            moisture: 0.0,
            flags: CornerFlags::empty(),
            adjacent: Vec::new(),
            touches: Vec::new(),
            protrudes: Vec::new(),
        }
    }

    #[inline]
    pub fn is_water(&self) -> bool {
        self.flags.contains(CornerFlags::WATER)
    }

    #[inline]
    pub fn is_ocean(&self) -> bool {
        self.flags.contains(CornerFlags::OCEAN)
    }

    #[inline]
    pub fn is_coast(&self) -> bool {
        self.flags.contains(CornerFlags::COAST)
    }

    #[inline]
    pub fn is_border(&self) -> bool {
        self.flags.contains(CornerFlags::BORDER)
    }

    /// Neither ocean nor coast
    #[inline]
    pub fn is_land(&self) -> bool {
        !self.is_ocean() && !self.is_coast()
    }

    #[inline]
    pub fn set_flag(&mut self, flag: CornerFlags, value: bool) {
        self.flags.set(flag, value);
    }
}
