//! Moisture
//!
//! Fresh water spreads moisture inland, losing a tenth per hop. Salt water
//! regions are simply wet.

use std::collections::VecDeque;

use crate::map::Map;

/// Falloff per hop away from fresh water
const FALLOFF: f64 = 0.9;

/// Spread moisture from lakes and rivers across the region graph
pub(crate) fn assign_moisture(map: &mut Map) {
    let mut queue = VecDeque::new();

    for region in &mut map.regions {
        let magnitude = region.river_magnitude();
        let fresh = region.is_water() || magnitude > 0.0;
        if fresh && !region.is_ocean() {
            region.moisture = if magnitude > 0.0 {
                (0.1 * magnitude).min(3.0)
            } else {
                1.0
            };
            queue.push_back(region.index);
        } else {
            region.moisture = 0.0;
        }
    }

    while let Some(id) = queue.pop_front() {
        let offered = map.regions[id].moisture * FALLOFF;
        for i in 0..map.regions[id].neighbors.len() {
            let n = map.regions[id].neighbors[i];
            if offered > map.regions[n].moisture {
                map.regions[n].moisture = offered;
                queue.push_back(n);
            }
        }
    }

    for region in &mut map.regions {
        if region.is_ocean() || region.is_coast() {
            region.moisture = 1.0;
        }
    }
}

/// Spread land moisture evenly over `[0, 1)` by rank
///
/// Ocean and coast keep their moisture. Ties keep index order.
pub(crate) fn redistribute_moisture(map: &mut Map) {
    let mut land: Vec<usize> = map
        .regions
        .iter()
        .filter(|r| !r.is_ocean() && !r.is_coast())
        .map(|r| r.index)
        .collect();
    land.sort_by(|&a, &b| map.regions[a].moisture.total_cmp(&map.regions[b].moisture));

    let len = land.len() as f64;
    for (i, &id) in land.iter().enumerate() {
        map.regions[id].moisture = i as f64 / len;
    }
}

/// Corner moisture is the mean of the regions it touches
pub(crate) fn assign_corner_moisture(map: &mut Map) {
    for corner in &mut map.corners {
        if corner.touches.is_empty() {
            corner.moisture = 0.0;
            continue;
        }
        let sum: f64 = corner.touches.iter().map(|&r| map.regions[r].moisture).sum();
        corner.moisture = sum / corner.touches.len() as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RegionFlags;
    use crate::map::tests::graph_only;

    #[test]
    fn test_moisture_falls_off_from_lake() {
        let mut map = graph_only(64, 42);
        let lake = 8 * map.params.grid_size() + 8;
        map.regions[lake].flags = RegionFlags::WATER;
        assign_moisture(&mut map);

        assert_eq!(map.regions[lake].moisture, 1.0);
        for &n in &map.regions[lake].neighbors {
            assert!((map.regions[n].moisture - 0.9).abs() < 1e-12);
        }
        for region in &map.regions {
            assert!(region.moisture <= 1.0);
        }
    }

    #[test]
    fn test_river_moisture_is_capped() {
        let mut map = graph_only(64, 42);
        map.regions[100].river_mut().add_flow(50.0);
        map.regions[120].river_mut().add_flow(5.0);
        assign_moisture(&mut map);

        assert_eq!(map.regions[100].moisture, 3.0);
        assert!(map.regions[120].moisture >= 0.5);
    }

    #[test]
    fn test_salt_water_is_wet() {
        let mut map = graph_only(64, 42);
        map.regions[0].flags = RegionFlags::WATER | RegionFlags::OCEAN;
        map.regions[1].flags = RegionFlags::COAST;
        assign_moisture(&mut map);

        assert_eq!(map.regions[0].moisture, 1.0);
        assert_eq!(map.regions[1].moisture, 1.0);
        // Ocean does not spread moisture
        assert_eq!(map.regions[200].moisture, 0.0);
    }

    #[test]
    fn test_redistribution_is_uniform_rank() {
        let mut map = graph_only(64, 42);
        map.regions[0].flags = RegionFlags::WATER | RegionFlags::OCEAN;
        for region in &mut map.regions {
            region.moisture = (region.index % 7) as f64;
        }
        map.regions[0].moisture = 1.0;
        redistribute_moisture(&mut map);

        assert_eq!(map.regions[0].moisture, 1.0);
        let land = (map.regions.len() - 1) as f64;
        let mut values: Vec<f64> = map.regions[1..].iter().map(|r| r.moisture).collect();
        values.sort_by(f64::total_cmp);
        for (i, m) in values.iter().enumerate() {
            assert!((m - i as f64 / land).abs() < 1e-12);
        }
        // Rank order follows the old moisture
        assert!(map.regions[6].moisture > map.regions[1].moisture);
    }

    #[test]
    fn test_corner_moisture_mean() {
        let mut map = graph_only(64, 42);
        for region in &mut map.regions {
            region.moisture = if region.index % 2 == 0 { 1.0 } else { 0.0 };
        }
        assign_corner_moisture(&mut map);
        for corner in &map.corners {
            let expected = corner
                .touches
                .iter()
                .map(|&r| map.regions[r].moisture)
                .sum::<f64>()
                / corner.touches.len().max(1) as f64;
            assert!((corner.moisture - expected).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&corner.moisture));
        }
    }
}
