//! Canyon chains

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::RegionId;

/// One step of a canyon
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanyonNode {
    pub region: RegionId,
    pub up: Option<RegionId>,
    pub down: Option<RegionId>,
}

/// A downhill chain of regions gouged below the surrounding terrain
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Canyon {
    pub nodes: Vec<CanyonNode>,
    /// Lowest elevation seen along the chain
    pub min_elevation: f64,
}

impl Canyon {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            min_elevation: f64::MAX,
        }
    }

    /// Append a region, linking it to the current tail
    pub fn push(&mut self, region: RegionId, elevation: f64) {
        let up = self.nodes.last().map(|n| n.region);
        if let Some(last) = self.nodes.last_mut() {
            last.down = Some(region);
        }
        self.nodes.push(CanyonNode {
            region,
            up,
            down: None,
        });
        self.min_elevation = self.min_elevation.min(elevation);
    }

    pub fn contains(&self, region: RegionId) -> bool {
        self.nodes.iter().any(|n| n.region == region)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Canyon {
    fn default() -> Self {
        Self::new()
    }
}
