//! Region structure
//!
//! A region is one Voronoi cell around a lattice site, the basic terrain tile.

use std::collections::BTreeMap;

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{push_unique, CornerId, EdgeId, RegionId};
use crate::geometry::Point;
use crate::terrain::Biome;

bitflags! {
    /// Water and feature classification of a region
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegionFlags: u16 {
        /// Fresh or salt water
        const WATER = 1 << 0;
        /// Water connected to the map edge
        const OCEAN = 1 << 1;
        /// Land next to ocean
        const COAST = 1 << 2;
        /// Ocean next to land
        const COAST_WATER = 1 << 3;
        /// Touches the map edge
        const BORDER = 1 << 4;
        /// Part of a volcano caldera
        const LAVA = 1 << 5;
        /// Part of a carved canyon
        const CANYON = 1 << 6;
        /// Part of a flattened valley
        const VALLEY = 1 << 7;
    }
}

/// Key of the per-region attribute side table
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKind {
    /// River flow through the region
    River,
}

/// Optional per-feature data attached to a region
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// River flow through the region
    River(RiverAttribute),
}

impl Attribute {
    /// Kind under which this attribute is stored
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::River(_) => AttributeKind::River,
        }
    }
}

/// River flow through a region
///
/// The final node of a river gets an attribute with only an up-river entry and
/// zero magnitude, so presence alone does not mean the region carries water.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiverAttribute {
    /// Sum of the widths of every river flowing through the region
    pub magnitude: f64,
    /// Regions whose rivers flow into this one
    pub upriver: Vec<RegionId>,
    /// Region this one drains into
    pub downriver: Option<RegionId>,
}

impl RiverAttribute {
    /// Add a river of the given width
    pub fn add_flow(&mut self, width: f64) {
        self.magnitude += width;
    }

    /// Register a region flowing into this one
    pub fn add_upriver(&mut self, region: RegionId) {
        push_unique(&mut self.upriver, region);
    }
}

/// A single Voronoi cell of the island
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Region {
    /// Stable index into the map's region arena
    pub index: RegionId,

    /// Lattice site this cell was built around
    pub point: Point,

    /// Normalized elevation, below 0 for ocean once generation completes
    pub elevation: f64,

    /// Normalized moisture in [0, 1]
    pub moisture: f64,

    /// Biome assigned by the final stage
    pub biome: Biome,

    /// Water and feature classification
    pub flags: RegionFlags,

    /// Regions sharing an edge with this one, clockwise once generation completes
    pub neighbors: Vec<RegionId>,

    /// Corners of the cell polygon, clockwise once generation completes
    pub corners: Vec<CornerId>,

    /// Edges bounding the cell
    pub borders: Vec<EdgeId>,

    /// Steepest-descent neighbor (possibly the region itself)
    pub downslope: Option<RegionId>,

    /// Optional per-feature data
    pub attributes: BTreeMap<AttributeKind, Attribute>,
}

impl Region {
    /// Create an unlinked region at a site
    pub fn new(index: RegionId, point: Point) -> Self {
        Self {
            index,
            point,
            elevation: 0.0,
            moisture: 0.0,
            biome: Biome::default(),
            flags: RegionFlags::empty(),
            neighbors: Vec::new(),
            corners: Vec::new(),
            borders: Vec::new(),
            downslope: None,
            attributes: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn is_water(&self) -> bool {
        self.flags.contains(RegionFlags::WATER)
    }

    #[inline]
    pub fn is_ocean(&self) -> bool {
        self.flags.contains(RegionFlags::OCEAN)
    }

    #[inline]
    pub fn is_coast(&self) -> bool {
        self.flags.contains(RegionFlags::COAST)
    }

    #[inline]
    pub fn is_coast_water(&self) -> bool {
        self.flags.contains(RegionFlags::COAST_WATER)
    }

    #[inline]
    pub fn is_border(&self) -> bool {
        self.flags.contains(RegionFlags::BORDER)
    }

    #[inline]
    pub fn is_lava(&self) -> bool {
        self.flags.contains(RegionFlags::LAVA)
    }

    #[inline]
    pub fn is_canyon(&self) -> bool {
        self.flags.contains(RegionFlags::CANYON)
    }

    #[inline]
    pub fn is_valley(&self) -> bool {
        self.flags.contains(RegionFlags::VALLEY)
    }

    /// Inland water, i.e. part of a lake
    #[inline]
    pub fn is_lake(&self) -> bool {
        self.is_water() && !self.is_ocean()
    }

    /// Set or clear a flag
    #[inline]
    pub fn set_flag(&mut self, flag: RegionFlags, value: bool) {
        self.flags.set(flag, value);
    }

    /// River attribute, if any river touches this region
    pub fn river(&self) -> Option<&RiverAttribute> {
        match self.attributes.get(&AttributeKind::River) {
            Some(Attribute::River(river)) => Some(river),
            None => None,
        }
    }

    /// River attribute, created empty on first access
    pub fn river_mut(&mut self) -> &mut RiverAttribute {
        let entry = self
            .attributes
            .entry(AttributeKind::River)
            .or_insert_with(|| Attribute::River(RiverAttribute::default()));
        match entry {
            Attribute::River(river) => river,
        }
    }

    /// Drop the river attribute
    pub fn remove_river(&mut self) -> Option<RiverAttribute> {
        match self.attributes.remove(&AttributeKind::River) {
            Some(Attribute::River(river)) => Some(river),
            None => None,
        }
    }

    /// River magnitude flowing through this region (0 if none)
    #[inline]
    pub fn river_magnitude(&self) -> f64 {
        self.river().map_or(0.0, |r| r.magnitude)
    }

    /// Whether a river with nonzero flow passes through this region
    #[inline]
    pub fn carries_river(&self) -> bool {
        self.river_magnitude() > 0.0
    }

    /// Explicit down-river link, overriding natural drainage
    #[inline]
    pub fn downriver(&self) -> Option<RegionId> {
        self.river().and_then(|r| r.downriver)
    }

    /// Number of neighboring regions
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if a region is a neighbor of this one
    #[inline]
    pub fn is_neighbor(&self, other: RegionId) -> bool {
        self.neighbors.contains(&other)
    }
}
