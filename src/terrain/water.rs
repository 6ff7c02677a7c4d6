//! Ocean, coast and land classification
//!
//! Regions touching the map edge seed an ocean flood fill through water
//! regions, which separates the sea from inland lakes. Corner flags are then
//! derived from the regions meeting at each corner.

use std::collections::VecDeque;

use crate::graph::{CornerFlags, RegionFlags};
use crate::map::Map;

/// Classify every region and corner as ocean, coast, water or land
pub(crate) fn assign_ocean_coast_and_land(map: &mut Map) {
    let threshold = map.params.lake_threshold;
    let mut queue = VecDeque::new();

    for id in 0..map.regions.len() {
        let mut water_corners = 0usize;
        let mut border = false;

        for i in 0..map.regions[id].corners.len() {
            let c = map.regions[id].corners[i];
            let corner = &mut map.corners[c];
            if corner.is_border() {
                border = true;
                corner.set_flag(CornerFlags::WATER, true);
            }
            if corner.is_water() {
                water_corners += 1;
            }
        }

        let region = &mut map.regions[id];
        if border {
            region.flags.insert(RegionFlags::BORDER | RegionFlags::OCEAN);
            queue.push_back(id);
        }
        let corner_count = region.corners.len() as f64;
        let water = region.is_ocean() || water_corners as f64 >= corner_count * threshold;
        region.set_flag(RegionFlags::WATER, water);
    }

    while let Some(id) = queue.pop_front() {
        for i in 0..map.regions[id].neighbors.len() {
            let n = map.regions[id].neighbors[i];
            let neighbor = &mut map.regions[n];
            if neighbor.is_water() && !neighbor.is_ocean() {
                neighbor.set_flag(RegionFlags::OCEAN, true);
                queue.push_back(n);
            }
        }
    }

    for id in 0..map.regions.len() {
        let region = &map.regions[id];
        let any_ocean = region.neighbors.iter().any(|&n| map.regions[n].is_ocean());
        let any_land = region.neighbors.iter().any(|&n| !map.regions[n].is_water());
        let ocean = region.is_ocean();

        let region = &mut map.regions[id];
        region.set_flag(RegionFlags::COAST, any_ocean && !ocean);
        region.set_flag(RegionFlags::COAST_WATER, ocean && any_land);
    }

    for id in 0..map.corners.len() {
        let corner = &map.corners[id];
        let total = corner.touches.len();
        let ocean = corner
            .touches
            .iter()
            .filter(|&&r| map.regions[r].is_ocean())
            .count();
        let land = corner
            .touches
            .iter()
            .filter(|&&r| !map.regions[r].is_water())
            .count();

        let corner = &mut map.corners[id];
        corner.set_flag(CornerFlags::OCEAN, ocean == total);
        corner.set_flag(CornerFlags::COAST, ocean > 0 && land > 0);
        let water = corner.is_border() || (land != total && !corner.is_coast());
        corner.set_flag(CornerFlags::WATER, water);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::map::tests::graph_only;
    use crate::terrain::elevation::assign_corner_elevations;

    fn classify<F: Fn(Point) -> bool>(shape: F) -> Map {
        let mut map = graph_only(64, 42);
        assign_corner_elevations(&mut map, &shape);
        assign_ocean_coast_and_land(&mut map);
        map
    }

    #[test]
    fn test_all_water_is_ocean() {
        let map = classify(|_| false);
        assert!(map.regions.iter().all(|r| r.is_ocean() && r.is_water()));
        assert!(map.regions.iter().all(|r| !r.is_coast() && !r.is_coast_water()));
        assert!(map.corners.iter().all(|c| c.is_ocean() && c.is_water()));
    }

    #[test]
    fn test_border_regions_are_ocean() {
        let map = classify(|_| true);
        for region in &map.regions {
            if region.is_border() {
                assert!(region.is_ocean());
            }
        }
        assert!(map.regions.iter().any(|r| !r.is_water()));
    }

    #[test]
    fn test_ocean_connected_to_border() {
        let center = Point::splat(32.0);
        let map = classify(|p: Point| p.distance(center) < 22.0);

        // Every ocean region reaches a border region through water regions
        for start in map.regions.iter().filter(|r| r.is_ocean()) {
            let mut seen = vec![start.index];
            let mut queue = VecDeque::from([start.index]);
            let mut reached = false;
            while let Some(id) = queue.pop_front() {
                if map.regions[id].is_border() {
                    reached = true;
                    break;
                }
                for &n in &map.regions[id].neighbors {
                    if map.regions[n].is_water() && !seen.contains(&n) {
                        seen.push(n);
                        queue.push_back(n);
                    }
                }
            }
            assert!(reached, "ocean region {} is cut off", start.index);
        }
    }

    #[test]
    fn test_inland_lake_is_not_ocean() {
        let center = Point::splat(32.0);
        let map = classify(|p: Point| {
            let d = p.distance(center);
            d < 24.0 && d > 6.0
        });

        let lake: Vec<_> = map.regions.iter().filter(|r| r.is_lake()).collect();
        assert!(!lake.is_empty(), "the hole in the ring should be a lake");
        assert!(lake.iter().all(|r| !r.is_coast() && !r.is_coast_water()));
    }

    #[test]
    fn test_coast_flags() {
        let center = Point::splat(32.0);
        let map = classify(|p: Point| p.distance(center) < 22.0);

        for region in &map.regions {
            let ocean_neighbor = region.neighbors.iter().any(|&n| map.regions[n].is_ocean());
            assert_eq!(region.is_coast(), ocean_neighbor && !region.is_ocean());
        }
        assert!(map.regions.iter().any(|r| r.is_coast()));
        assert!(map.regions.iter().any(|r| r.is_coast_water()));
        assert!(map.corners.iter().any(|c| c.is_coast()));
    }
}
