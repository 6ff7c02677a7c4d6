//! Biome classification and small-island pruning

use std::collections::VecDeque;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::graph::{RegionFlags, RegionId};
use crate::map::Map;

/// Maximum landmass size that pruning may delete
const ISLAND_CAP: usize = 25;

/// Categorical terrain classification of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Biome {
    #[default]
    Ocean,
    Marsh,
    Lake,
    Beach,
    Snow,
    Tundra,
    Bare,
    Scorched,
    Taiga,
    Shrubland,
    TemperateDesert,
    TemperateRainForest,
    TemperateDeciduousForest,
    Grassland,
    TropicalRainForest,
    TropicalSeasonalForest,
    SubtropicalDesert,
}

impl Biome {
    /// Every biome, in id order
    pub const ALL: [Biome; 17] = [
        Biome::Ocean,
        Biome::Marsh,
        Biome::Lake,
        Biome::Beach,
        Biome::Snow,
        Biome::Tundra,
        Biome::Bare,
        Biome::Scorched,
        Biome::Taiga,
        Biome::Shrubland,
        Biome::TemperateDesert,
        Biome::TemperateRainForest,
        Biome::TemperateDeciduousForest,
        Biome::Grassland,
        Biome::TropicalRainForest,
        Biome::TropicalSeasonalForest,
        Biome::SubtropicalDesert,
    ];

    /// Stable numeric id used by the tag format
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Biome with the given id
    pub fn from_id(id: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(id))
            .copied()
            .ok_or(MapError::UnknownBiome(id))
    }

    /// Whether the biome is open or inland water
    pub fn is_water(self) -> bool {
        matches!(self, Biome::Ocean | Biome::Lake | Biome::Marsh)
    }

    /// Classify a region from its water flags, elevation and moisture
    ///
    /// Thresholds are exclusive: a land region at exactly 0.8 elevation is in
    /// the 0.6 band.
    pub fn classify(ocean: bool, water: bool, coast: bool, elevation: f64, moisture: f64) -> Self {
        if ocean {
            Biome::Ocean
        } else if water {
            if elevation < 0.1 {
                Biome::Marsh
            } else {
                Biome::Lake
            }
        } else if coast {
            Biome::Beach
        } else if elevation > 0.8 {
            if moisture > 0.50 {
                Biome::Snow
            } else if moisture > 0.33 {
                Biome::Tundra
            } else if moisture > 0.16 {
                Biome::Bare
            } else {
                Biome::Scorched
            }
        } else if elevation > 0.6 {
            if moisture > 0.66 {
                Biome::Taiga
            } else if moisture > 0.33 {
                Biome::Shrubland
            } else {
                Biome::TemperateDesert
            }
        } else if elevation > 0.3 {
            if moisture > 0.83 {
                Biome::TemperateRainForest
            } else if moisture > 0.50 {
                Biome::TemperateDeciduousForest
            } else if moisture > 0.16 {
                Biome::Grassland
            } else {
                Biome::TemperateDesert
            }
        } else if moisture > 0.66 {
            Biome::TropicalRainForest
        } else if moisture > 0.33 {
            Biome::TropicalSeasonalForest
        } else if moisture > 0.16 {
            Biome::Grassland
        } else {
            Biome::SubtropicalDesert
        }
    }
}

/// Assign every region's biome, delete small islands near the map edge and
/// sink ocean regions below sea level
pub(crate) fn assign_biomes<R: Rng + ?Sized>(map: &mut Map, rng: &mut R) {
    let size = f64::from(map.params.size);
    let band = map.params.border_band();
    let (min, max) = (band, size - band);
    let mut pruned = 0usize;

    for id in 0..map.regions.len() {
        let region = &map.regions[id];
        let biome = Biome::classify(
            region.is_ocean(),
            region.is_water(),
            region.is_coast(),
            region.elevation,
            region.moisture,
        );
        map.regions[id].biome = biome;

        let region = &map.regions[id];
        let p = region.point;
        if !region.is_water() && (p.x < min || p.x > max || p.y < min || p.y > max) {
            if let Some(island) = count_island(map, id, ISLAND_CAP) {
                pruned += island.len();
                for n in island {
                    let member = &mut map.regions[n];
                    member.flags.insert(RegionFlags::WATER | RegionFlags::OCEAN);
                    member.biome = Biome::Ocean;
                }
            }
        }

        let region = &mut map.regions[id];
        if region.is_coast_water() {
            region.elevation = -0.01 - rng.gen::<f64>() * 0.03;
        } else if region.is_ocean() {
            region.elevation = -0.1 - rng.gen::<f64>() * 0.25;
        }
    }

    if pruned > 0 {
        log::debug!("pruned {} regions of small border islands", pruned);
    }
}

/// Land regions reachable from `start`, or `None` once `cap` is reached
pub(crate) fn count_island(map: &Map, start: RegionId, cap: usize) -> Option<Vec<RegionId>> {
    let mut island = vec![start];
    let mut queue = VecDeque::from([start]);

    while let Some(id) = queue.pop_front() {
        for &n in &map.regions[id].neighbors {
            if !map.regions[n].is_water() && !island.contains(&n) {
                island.push(n);
                queue.push_back(n);
            }
        }
        if island.len() >= cap {
            return None;
        }
    }

    Some(island)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::graph_only;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_biome_ids_round_trip() {
        for biome in Biome::ALL {
            assert_eq!(Biome::from_id(biome.id()).unwrap(), biome);
        }
        assert_eq!(Biome::from_id(17), Err(MapError::UnknownBiome(17)));
    }

    #[test]
    fn test_water_biomes() {
        assert_eq!(Biome::classify(true, true, false, 0.5, 0.5), Biome::Ocean);
        assert_eq!(Biome::classify(false, true, false, 0.05, 0.5), Biome::Marsh);
        assert_eq!(Biome::classify(false, true, false, 0.1, 0.5), Biome::Lake);
        assert_eq!(Biome::classify(false, false, true, 0.9, 0.9), Biome::Beach);
    }

    #[test]
    fn test_high_band() {
        let b = |m| Biome::classify(false, false, false, 0.81, m);
        assert_eq!(b(0.51), Biome::Snow);
        assert_eq!(b(0.50), Biome::Tundra);
        assert_eq!(b(0.34), Biome::Tundra);
        assert_eq!(b(0.33), Biome::Bare);
        assert_eq!(b(0.17), Biome::Bare);
        assert_eq!(b(0.16), Biome::Scorched);
    }

    #[test]
    fn test_upper_middle_band() {
        let b = |m| Biome::classify(false, false, false, 0.8, m);
        assert_eq!(b(0.67), Biome::Taiga);
        assert_eq!(b(0.66), Biome::Shrubland);
        assert_eq!(b(0.34), Biome::Shrubland);
        assert_eq!(b(0.33), Biome::TemperateDesert);
    }

    #[test]
    fn test_lower_middle_band() {
        let b = |m| Biome::classify(false, false, false, 0.6, m);
        assert_eq!(b(0.84), Biome::TemperateRainForest);
        assert_eq!(b(0.83), Biome::TemperateDeciduousForest);
        assert_eq!(b(0.51), Biome::TemperateDeciduousForest);
        assert_eq!(b(0.50), Biome::Grassland);
        assert_eq!(b(0.17), Biome::Grassland);
        assert_eq!(b(0.16), Biome::TemperateDesert);
    }

    #[test]
    fn test_low_band() {
        let b = |m| Biome::classify(false, false, false, 0.3, m);
        assert_eq!(b(0.67), Biome::TropicalRainForest);
        assert_eq!(b(0.66), Biome::TropicalSeasonalForest);
        assert_eq!(b(0.34), Biome::TropicalSeasonalForest);
        assert_eq!(b(0.33), Biome::Grassland);
        assert_eq!(b(0.17), Biome::Grassland);
        assert_eq!(b(0.16), Biome::SubtropicalDesert);
    }

    #[test]
    fn test_small_border_island_is_pruned() {
        let mut map = graph_only(64, 42);
        for region in &mut map.regions {
            region.flags = RegionFlags::WATER | RegionFlags::OCEAN;
        }

        // Region (column 1, row 1) and four of its neighbors, all inside the border band
        let grid = map.params.grid_size();
        let seed = grid + 1;
        let mut island = vec![seed];
        island.extend(map.regions[seed].neighbors.iter().copied().take(4));
        for &id in &island {
            map.regions[id].flags = RegionFlags::empty();
            map.regions[id].elevation = 0.4;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assign_biomes(&mut map, &mut rng);

        for &id in &island {
            let region = &map.regions[id];
            assert!(region.is_ocean() && region.is_water());
            assert_eq!(region.biome, Biome::Ocean);
        }
    }

    #[test]
    fn test_large_island_survives() {
        let mut map = graph_only(64, 42);
        for region in &mut map.regions {
            region.flags = RegionFlags::empty();
            region.elevation = 0.5;
            region.moisture = 0.5;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assign_biomes(&mut map, &mut rng);

        assert!(map.regions.iter().all(|r| !r.is_water()));
        assert!(map.regions.iter().all(|r| r.biome == Biome::TemperateDesert
            || r.biome == Biome::Grassland));
    }

    #[test]
    fn test_ocean_sinks_below_sea_level() {
        let mut map = graph_only(64, 42);
        for region in &mut map.regions {
            region.flags = RegionFlags::WATER | RegionFlags::OCEAN;
        }
        map.regions[0].flags.insert(RegionFlags::COAST_WATER);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assign_biomes(&mut map, &mut rng);

        let coast_water = map.regions[0].elevation;
        assert!((-0.04..=-0.01).contains(&coast_water));
        for region in &map.regions[1..] {
            assert!((-0.35..=-0.1).contains(&region.elevation));
        }
    }
}
