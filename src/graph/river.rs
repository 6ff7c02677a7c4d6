//! River chains

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::RegionId;

/// One step of a river
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiverNode {
    pub region: RegionId,
    pub up: Option<RegionId>,
    pub down: Option<RegionId>,
}

impl RiverNode {
    pub fn new(region: RegionId) -> Self {
        Self {
            region,
            up: None,
            down: None,
        }
    }
}

/// An ordered chain of regions from a source down to water
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct River {
    pub nodes: Vec<RiverNode>,
    /// Nodes added before the river joined an existing one
    pub length_to_merge: usize,
    pub width: f64,
}

impl River {
    /// Start a river at its source region
    pub fn new(source: RegionId) -> Self {
        Self {
            nodes: vec![RiverNode::new(source)],
            length_to_merge: 0,
            width: 1.0,
        }
    }

    /// Source region
    pub fn source(&self) -> RegionId {
        self.nodes[0].region
    }

    /// Region the river ends in
    pub fn mouth(&self) -> RegionId {
        self.nodes[self.nodes.len() - 1].region
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the chain already passes through a region
    pub fn contains(&self, region: RegionId) -> bool {
        self.nodes.iter().any(|n| n.region == region)
    }

    /// Extend the chain by one region, linking it to the current tail
    pub fn push(&mut self, region: RegionId) {
        let tail = self.mouth();
        if let Some(last) = self.nodes.last_mut() {
            last.down = Some(region);
        }
        self.nodes.push(RiverNode {
            region,
            up: Some(tail),
            down: None,
        });
    }

    /// Regions of the chain in flow order
    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.nodes.iter().map(|n| n.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_river_links() {
        let mut river = River::new(5);
        river.push(6);
        river.push(9);

        assert_eq!(river.source(), 5);
        assert_eq!(river.mouth(), 9);
        assert_eq!(river.len(), 3);
        assert_eq!(river.nodes[0].down, Some(6));
        assert_eq!(river.nodes[1].up, Some(5));
        assert_eq!(river.nodes[1].down, Some(9));
        assert_eq!(river.nodes[2].up, Some(6));
        assert!(river.contains(6));
        assert!(!river.contains(7));
        assert_eq!(river.regions().collect::<Vec<_>>(), vec![5, 6, 9]);
    }
}
