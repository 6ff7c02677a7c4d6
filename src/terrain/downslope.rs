//! Drainage direction helpers
//!
//! Downslopes compare elevations in whole world height units, so regions
//! within one unit of each other count as level.

use crate::graph::RegionId;
use crate::map::Map;

/// Point every region at its steepest-descent neighbor
///
/// The lowest neighbor wins, ties going to the later neighbor, and a region
/// with no lower neighbor drains into itself. An explicit down-river link
/// overrides the terrain.
pub(crate) fn calculate_downslopes(map: &mut Map) {
    for id in 0..map.regions.len() {
        let downslope = match map.regions[id].downriver() {
            Some(down) => down,
            None => {
                let mut down = id;
                let mut down_units = map.params.height_units(map.regions[id].elevation);
                for &n in &map.regions[id].neighbors {
                    let units = map.params.height_units(map.regions[n].elevation);
                    if units <= down_units {
                        down = n;
                        down_units = units;
                    }
                }
                down
            }
        };
        map.regions[id].downslope = Some(downslope);
    }
}

/// Lowest neighbor by raw elevation, or the down-river link if the region has one
pub(crate) fn lowest_neighbor(map: &Map, id: RegionId) -> RegionId {
    let region = &map.regions[id];
    if let Some(down) = region.downriver() {
        return down;
    }
    let mut lowest = id;
    for &n in &region.neighbors {
        if map.regions[n].elevation < map.regions[lowest].elevation {
            lowest = n;
        }
    }
    lowest
}

/// Highest neighbor by raw elevation
///
/// A region fed by rivers answers with the lowest of its up-river regions, so
/// slope queries follow the river instead of the terrain.
pub(crate) fn highest_neighbor(map: &Map, id: RegionId) -> RegionId {
    let region = &map.regions[id];
    if let Some(river) = region.river() {
        if let Some(lowest) = lowest_of(map, &river.upriver) {
            return lowest;
        }
    }
    let mut highest = id;
    for &n in &region.neighbors {
        if map.regions[n].elevation > map.regions[highest].elevation {
            highest = n;
        }
    }
    highest
}

/// Lowest region of a group, the first one on ties
fn lowest_of(map: &Map, group: &[RegionId]) -> Option<RegionId> {
    let mut iter = group.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |low, r| {
        if map.regions[r].elevation < map.regions[low].elevation {
            r
        } else {
            low
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::graph_only;

    fn sloped_map() -> Map {
        let mut map = graph_only(64, 42);
        // Elevation falls toward the left edge
        for region in &mut map.regions {
            region.elevation = region.point.x / 64.0;
        }
        map
    }

    #[test]
    fn test_downslope_points_downhill() {
        let mut map = sloped_map();
        calculate_downslopes(&mut map);

        for region in &map.regions {
            let down = region.downslope.unwrap();
            let own = map.params.height_units(region.elevation);
            assert!(map.params.height_units(map.regions[down].elevation) <= own);
            if down != region.index {
                assert!(region.is_neighbor(down));
            }
        }
    }

    #[test]
    fn test_level_region_ties_to_last_neighbor() {
        let mut map = graph_only(64, 42);
        for region in &mut map.regions {
            region.elevation = 0.5;
        }
        calculate_downslopes(&mut map);
        let region = &map.regions[40];
        assert_eq!(region.downslope, region.neighbors.last().copied());
    }

    #[test]
    fn test_downriver_overrides_downslope() {
        let mut map = sloped_map();
        let id = 100;
        let uphill = map.regions[id]
            .neighbors
            .iter()
            .copied()
            .max_by(|&a, &b| map.regions[a].elevation.total_cmp(&map.regions[b].elevation))
            .unwrap();
        map.regions[id].river_mut().downriver = Some(uphill);

        calculate_downslopes(&mut map);
        assert_eq!(map.regions[id].downslope, Some(uphill));
        assert_eq!(lowest_neighbor(&map, id), uphill);
    }

    #[test]
    fn test_highest_neighbor_follows_upriver() {
        let mut map = sloped_map();
        let id = 100;
        let natural = highest_neighbor(&map, id);
        assert!(map.regions[natural].elevation > map.regions[id].elevation);

        let group: Vec<_> = map.regions[id].neighbors.iter().copied().take(2).collect();
        for &g in &group {
            map.regions[id].river_mut().add_upriver(g);
        }
        let expected = if map.regions[group[1]].elevation < map.regions[group[0]].elevation {
            group[1]
        } else {
            group[0]
        };
        assert_eq!(highest_neighbor(&map, id), expected);
    }

    #[test]
    fn test_lowest_neighbor_is_self_on_peak() {
        let mut map = graph_only(64, 42);
        for region in &mut map.regions {
            region.elevation = 0.1;
        }
        map.regions[50].elevation = 0.0;
        assert_eq!(lowest_neighbor(&map, 50), 50);
    }
}
