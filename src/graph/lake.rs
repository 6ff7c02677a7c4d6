//! Lakes

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::RegionId;

/// A connected group of inland water regions
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lake {
    regions: Vec<RegionId>,
    lowest: Option<(RegionId, f64)>,
}

impl Lake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member with its current elevation
    ///
    /// Duplicates are ignored. The lowest member is tracked at insertion time.
    pub fn add_region(&mut self, region: RegionId, elevation: f64) {
        if self.contains(region) {
            return;
        }
        self.regions.push(region);
        match self.lowest {
            Some((_, low)) if low <= elevation => {}
            _ => self.lowest = Some((region, elevation)),
        }
    }

    /// Rebuild a lake from saved members and its recorded lowest member
    pub(crate) fn restore(regions: Vec<RegionId>, lowest: Option<(RegionId, f64)>) -> Self {
        Self { regions, lowest }
    }

    /// Lowest member together with its elevation when it joined
    pub(crate) fn lowest_entry(&self) -> Option<(RegionId, f64)> {
        self.lowest
    }

    pub fn contains(&self, region: RegionId) -> bool {
        self.regions.contains(&region)
    }

    /// Members in discovery order
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    /// Lowest member, by elevation when it joined
    pub fn lowest(&self) -> Option<RegionId> {
        self.lowest.map(|(region, _)| region)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
