//! Corner and region elevation
//!
//! Elevation grows breadth-first inward from the map border, so no interior
//! corner is a local minimum. Land corners are then remapped onto a target
//! distribution and regions take the mean of their corners.

use std::collections::VecDeque;

use crate::config::Features;
use crate::graph::CornerFlags;
use crate::map::Map;
use crate::terrain::IslandShape;

/// Step added to every hop so water stays strictly increasing
const STEP_EPSILON: f64 = 1e-9;

/// Extra rise per land hop while still in the coastal lowlands
const LOWLAND_STEP: f64 = 0.05;

/// Elevation under which land hops use [`LOWLAND_STEP`]
const LOWLAND_LIMIT: f64 = 0.20;

/// Classify corners as land or water and relax elevations inward from the border
pub(crate) fn assign_corner_elevations<S: IslandShape + ?Sized>(map: &mut Map, shape: &S) {
    let mut queue = VecDeque::new();

    for corner in &mut map.corners {
        let water = !shape.is_land(corner.point);
        corner.set_flag(CornerFlags::WATER, water);
        if corner.is_border() {
            corner.elevation = 0.0;
            queue.push_back(corner.index);
        } else {
            corner.elevation = f64::MAX;
        }
    }

    while let Some(base) = queue.pop_front() {
        let base_elevation = map.corners[base].elevation;
        let base_land = !map.corners[base].is_water();

        for i in 0..map.corners[base].adjacent.len() {
            let adj = map.corners[base].adjacent[i];
            let adjacent = &mut map.corners[adj];
            if adjacent.is_border() {
                continue;
            }

            let mut proposal = base_elevation + STEP_EPSILON;
            let both_land = base_land && !adjacent.is_water();
            if both_land && proposal < LOWLAND_LIMIT {
                proposal += LOWLAND_STEP;
            } else if both_land {
                proposal += 1.0;
            }

            if proposal < adjacent.elevation {
                adjacent.elevation = proposal;
                queue.push_back(adj);
            }
        }
    }
}

/// Whether a corner touches both a water and a land region
fn is_shoreline(map: &Map, corner: usize) -> bool {
    let touches = &map.corners[corner].touches;
    let water = touches.iter().any(|&r| map.regions[r].is_water());
    let land = touches.iter().any(|&r| !map.regions[r].is_water());
    water && land
}

/// Remap land corner elevations so low ground is more common than high ground
///
/// Land corners are those that are neither ocean nor coast. They are ranked by
/// elevation and position `i` of `n` gets the quantile `y = i / (n - 1)` mapped
/// through `x = 1 - sqrt(1 - y)`, or `y²` / `y³` with the sharper mountain
/// features once `y >= 0.05`.
pub(crate) fn redistribute_elevations(map: &mut Map) {
    let mut land: Vec<usize> = map
        .corners
        .iter()
        .filter(|c| c.is_land())
        .map(|c| c.index)
        .collect();
    land.sort_by(|&a, &b| map.corners[a].elevation.total_cmp(&map.corners[b].elevation));

    let sharper = map.params.has_feature(Features::SHARPER_MOUNTAINS);
    let even_sharper = map.params.has_feature(Features::EVEN_SHARPER_MOUNTAINS);
    let denominator = land.len().saturating_sub(1).max(1) as f64;

    for (i, &id) in land.iter().enumerate() {
        let y = i as f64 / denominator;
        let x = if sharper && y >= 0.05 {
            y * y
        } else if even_sharper && y >= 0.05 {
            y * y * y
        } else {
            1.0 - (1.0 - y).sqrt()
        };

        let mut elevation = x.min(1.0);
        if !map.corners[id].is_water() && !is_shoreline(map, id) {
            elevation += 0.01;
        }
        map.corners[id].elevation = elevation;
    }
}

/// Pin ocean and coast corners to sea level
pub(crate) fn flatten_water_corners(map: &mut Map) {
    for corner in &mut map.corners {
        if corner.is_ocean() || corner.is_coast() {
            corner.elevation = 0.0;
        }
    }
}

/// Region elevation is the mean of its corners
///
/// With cliffs enabled, inland regions are lifted into `[0.15, 1.0]`.
pub(crate) fn assign_region_elevations(map: &mut Map) {
    let cliffs = map.params.has_feature(Features::CLIFFS);

    for id in 0..map.regions.len() {
        let region = &map.regions[id];
        let elevation = if region.corners.is_empty() {
            0.0
        } else {
            let sum: f64 = region.corners.iter().map(|&c| map.corners[c].elevation).sum();
            sum / region.corners.len() as f64
        };

        let region = &mut map.regions[id];
        region.elevation = elevation;
        if cliffs && !region.is_ocean() && !region.is_coast() && elevation >= 0.0 {
            region.elevation = (elevation * 0.85 + 0.15).max(0.15);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::graph::RegionFlags;
    use crate::map::tests::graph_only;
    use crate::terrain::water::assign_ocean_coast_and_land;

    fn disk(size: f64) -> impl Fn(Point) -> bool {
        move |p: Point| p.distance(Point::splat(size / 2.0)) < size * 0.35
    }

    #[test]
    fn test_border_corners_at_zero() {
        let mut map = graph_only(64, 42);
        assign_corner_elevations(&mut map, &disk(64.0));

        for corner in &map.corners {
            if corner.is_border() {
                assert_eq!(corner.elevation, 0.0);
            } else {
                assert!(corner.elevation > 0.0 && corner.elevation < f64::MAX);
            }
        }
    }

    #[test]
    fn test_no_interior_local_minima() {
        let mut map = graph_only(64, 42);
        assign_corner_elevations(&mut map, &disk(64.0));

        for corner in &map.corners {
            if corner.is_border() || corner.is_water() {
                continue;
            }
            let has_lower = corner
                .adjacent
                .iter()
                .any(|&a| map.corners[a].elevation <= corner.elevation);
            assert!(has_lower, "corner {} is a local minimum", corner.index);
        }
    }

    #[test]
    fn test_land_rises_faster_than_water() {
        let mut map = graph_only(64, 42);
        assign_corner_elevations(&mut map, &disk(64.0));

        let max_water = map
            .corners
            .iter()
            .filter(|c| c.is_water())
            .map(|c| c.elevation)
            .fold(0.0, f64::max);
        let max_land = map
            .corners
            .iter()
            .filter(|c| !c.is_water())
            .map(|c| c.elevation)
            .fold(0.0, f64::max);

        assert!(max_water < 1e-6, "water elevations only grow by epsilon");
        assert!(max_land > 1.0, "inland corners climb by whole steps");
    }

    #[test]
    fn test_redistribution_bounds() {
        let mut map = graph_only(64, 42);
        assign_corner_elevations(&mut map, &disk(64.0));
        assign_ocean_coast_and_land(&mut map);
        redistribute_elevations(&mut map);
        flatten_water_corners(&mut map);

        for corner in &map.corners {
            assert!(
                (0.0..=1.01).contains(&corner.elevation),
                "corner {} elevation {}",
                corner.index,
                corner.elevation
            );
        }
    }

    #[test]
    fn test_redistribution_curve() {
        let mut map = graph_only(64, 42);
        for (i, corner) in map.corners.iter_mut().enumerate() {
            corner.flags = CornerFlags::WATER;
            corner.elevation = i as f64;
        }
        for region in &mut map.regions {
            region.flags = RegionFlags::WATER;
        }
        let n = map.corners.len();
        redistribute_elevations(&mut map);

        assert_eq!(map.corners[0].elevation, 0.0);
        assert_eq!(map.corners[n - 1].elevation, 1.0);
        let mid = (n - 1) / 2;
        let y = mid as f64 / (n - 1) as f64;
        assert_eq!(map.corners[mid].elevation, 1.0 - (1.0 - y).sqrt());
    }

    #[test]
    fn test_sharper_mountains_curve() {
        let mut map = graph_only(64, 42);
        map.params.features = Features::SHARPER_MOUNTAINS;
        for (i, corner) in map.corners.iter_mut().enumerate() {
            corner.flags = CornerFlags::WATER;
            corner.elevation = i as f64;
        }
        for region in &mut map.regions {
            region.flags = RegionFlags::WATER;
        }
        let n = map.corners.len();
        redistribute_elevations(&mut map);

        let mid = (n - 1) / 2;
        let y = mid as f64 / (n - 1) as f64;
        assert_eq!(map.corners[mid].elevation, y * y);
    }

    #[test]
    fn test_region_mean_and_cliffs() {
        let mut map = graph_only(64, 42);
        for corner in &mut map.corners {
            corner.elevation = 0.4;
        }
        assign_region_elevations(&mut map);
        for region in &map.regions {
            assert!((region.elevation - 0.4).abs() < 1e-12);
        }

        map.params.features = Features::CLIFFS;
        map.regions[0].flags = RegionFlags::OCEAN | RegionFlags::WATER;
        assign_region_elevations(&mut map);
        assert!((map.regions[0].elevation - 0.4).abs() < 1e-12);
        assert!((map.regions[1].elevation - (0.4 * 0.85 + 0.15)).abs() < 1e-12);
    }
}
