//! Lake grouping and leveling

use std::collections::VecDeque;

use crate::graph::Lake;
use crate::map::Map;

/// Group inland water regions into lakes and level each one
///
/// Components are discovered in region index order. Every member is set to the
/// elevation of the lake's lowest member and each land neighbor is moved
/// halfway toward it.
pub(crate) fn build_lakes(map: &mut Map) {
    let mut lakes: Vec<Lake> = Vec::new();
    let mut assigned = vec![false; map.regions.len()];

    for start in 0..map.regions.len() {
        if assigned[start] || !map.regions[start].is_lake() {
            continue;
        }

        let mut lake = Lake::new();
        lake.add_region(start, map.regions[start].elevation);
        assigned[start] = true;
        let mut queue = VecDeque::from([start]);

        while let Some(id) = queue.pop_front() {
            for &n in &map.regions[id].neighbors {
                if !assigned[n] && map.regions[n].is_lake() {
                    assigned[n] = true;
                    lake.add_region(n, map.regions[n].elevation);
                    queue.push_back(n);
                }
            }
        }
        lakes.push(lake);
    }

    for lake in &lakes {
        let Some(lowest) = lake.lowest() else {
            continue;
        };
        let level = map.regions[lowest].elevation;

        for &member in lake.regions() {
            map.regions[member].elevation = level;
            for i in 0..map.regions[member].neighbors.len() {
                let n = map.regions[member].neighbors[i];
                let neighbor = &mut map.regions[n];
                if !neighbor.is_water() {
                    neighbor.elevation += (level - neighbor.elevation) / 2.0;
                }
            }
        }
    }

    log::debug!("found {} lakes", lakes.len());
    map.lakes = lakes;
}
