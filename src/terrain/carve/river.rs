//! Rivers
//!
//! Sources are drawn from high ground and from the outlets of lakes. Each
//! source walks downhill until it reaches water, merging into any river it
//! meets. Accepted rivers are written onto the regions they cross as a
//! magnitude plus up and down links.

use rand::Rng;

use super::{pick, MAX_WALK_STEPS};
use crate::config::Features;
use crate::graph::{RegionId, River};
use crate::map::Map;

/// Minimum elevation of a high-ground source
const SOURCE_ELEVATION: f64 = 0.2;

/// Sources above this elevation are skipped
const SOURCE_CEILING: f64 = 0.85;

/// A neighbor this much lower is taken as the next step outright
const STEEP_DROP: f64 = 0.06;

/// Lakes larger than this feed wider rivers
const WIDE_LAKE_SIZE: usize = 8;

/// Draw river sources and carve every river that reaches water
///
/// Returns the number of rivers written to the map. The rivers are also
/// appended to `map.rivers`.
pub(crate) fn create_rivers<R: Rng + ?Sized>(map: &mut Map, rng: &mut R) -> usize {
    let sources = draw_sources(map, rng);
    let mut created = 0;

    for source in sources {
        let region = &map.regions[source];
        if region.is_ocean() || region.elevation > SOURCE_CEILING || region.carries_river() {
            continue;
        }

        let mut river = walk_river(map, source, rng);
        if !accept(map, &river) {
            continue;
        }

        river.width = source_width(map, source);
        write_river(map, &river);
        map.rivers.push(river);
        created += 1;
    }

    log::debug!("carved {} rivers", created);
    created
}

fn draw_sources<R: Rng + ?Sized>(map: &Map, rng: &mut R) -> Vec<RegionId> {
    let canyons = map.params.has_feature(Features::CANYONS);
    let mut sources = Vec::new();
    if map.regions.is_empty() {
        return sources;
    }

    for _ in 0..map.params.size / 6 {
        let id = rng.gen_range(0..map.regions.len());
        let region = &map.regions[id];
        if region.elevation < SOURCE_ELEVATION || region.is_valley() {
            continue;
        }
        if canyons && !region.is_canyon() {
            continue;
        }
        sources.push(id);
    }

    for lake in &map.lakes {
        let Some(outlet) = lake.lowest() else {
            continue;
        };
        sources.push(outlet);
        for &n in &map.regions[outlet].neighbors {
            if map.regions[n].is_water() && rng.gen_bool(0.5) {
                sources.push(n);
            }
        }
    }

    sources
}

/// Follow the terrain downhill from `source`
///
/// The walk ends on reaching water after the first step, when no further
/// step is possible, or after [`MAX_WALK_STEPS`] steps.
fn walk_river<R: Rng + ?Sized>(map: &Map, source: RegionId, rng: &mut R) -> River {
    let mut river = River::new(source);
    let mut current = source;

    for step in 0..MAX_WALK_STEPS {
        if step > 0 && map.regions[current].is_water() {
            break;
        }
        let next = next_step(map, &river, current, step == 0, rng);
        if next == current || river.contains(next) {
            break;
        }
        if !map.regions[next].carries_river() {
            river.length_to_merge += 1;
        }
        river.push(next);
        current = next;
    }

    river
}

fn next_step<R: Rng + ?Sized>(
    map: &Map,
    river: &River,
    current: RegionId,
    first: bool,
    rng: &mut R,
) -> RegionId {
    let region = &map.regions[current];
    if let Some(down) = region.downriver() {
        return down;
    }

    let up = river.nodes.last().and_then(|n| n.up);
    let units = map.params.height_units(region.elevation);
    let mut candidates = Vec::new();
    if !region.carries_river() {
        for &n in &region.neighbors {
            let neighbor = &map.regions[n];
            if Some(n) == up {
                continue;
            }
            if up.is_some_and(|u| neighbor.is_neighbor(u)) {
                continue;
            }
            if map.params.height_units(neighbor.elevation) > units {
                continue;
            }
            if first && neighbor.is_lake() {
                continue;
            }
            candidates.push(n);
        }
    }

    if let Some(&n) = candidates.iter().find(|&&n| map.regions[n].carries_river()) {
        return n;
    }
    if let Some(&n) = candidates.iter().find(|&&n| map.regions[n].is_water()) {
        return n;
    }
    if let Some(&n) = candidates
        .iter()
        .find(|&&n| region.elevation - map.regions[n].elevation > STEEP_DROP)
    {
        return n;
    }
    pick(&candidates, rng)
        .or(region.downslope)
        .unwrap_or(current)
}

fn accept(map: &Map, river: &River) -> bool {
    let source = &map.regions[river.source()];
    if source.carries_river() {
        return false;
    }
    if source.neighbors.iter().any(|&n| map.regions[n].carries_river()) {
        return false;
    }
    if river.len() < 4 {
        return false;
    }
    let mouth = &map.regions[river.mouth()];
    if !mouth.is_water() {
        return false;
    }
    // Land sources need four regions of their own before a merge
    let drains_lake = source.is_water()
        && river.mouth() != river.source()
        && mouth.elevation < source.elevation;
    drains_lake || river.length_to_merge > 3
}

fn source_width(map: &Map, source: RegionId) -> f64 {
    let region = &map.regions[source];
    if !region.is_water() {
        return 1.0;
    }
    match map.lake_index_of(source) {
        Some(lake) if map.lakes[lake].len() > WIDE_LAKE_SIZE => 4.0 - 3.0 * region.elevation,
        _ => 1.0,
    }
}

/// Add the river's flow to every region it leaves and link the chain
fn write_river(map: &mut Map, river: &River) {
    for pair in river.nodes.windows(2) {
        let (from, to) = (pair[0].region, pair[1].region);
        let attr = map.regions[from].river_mut();
        attr.add_flow(river.width);
        attr.downriver = Some(to);
        map.regions[to].river_mut().add_upriver(from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RegionFlags;
    use crate::map::tests::graph_only;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Land rising to the right with ocean along the left edge
    fn coastal_ramp() -> Map {
        let mut map = graph_only(64, 42);
        for region in &mut map.regions {
            region.elevation = region.point.x / 64.0;
            if region.point.x < 8.0 {
                region.flags = RegionFlags::WATER | RegionFlags::OCEAN;
                region.elevation = 0.0;
            }
        }
        map
    }

    /// High ground away from the map edges
    fn inland_source(map: &Map) -> RegionId {
        map.regions
            .iter()
            .find(|r| r.point.x > 40.0 && r.point.y > 20.0 && r.point.y < 40.0)
            .unwrap()
            .index
    }

    #[test]
    fn test_walk_reaches_ocean() {
        let map = coastal_ramp();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let source = inland_source(&map);

        let river = walk_river(&map, source, &mut rng);
        assert!(river.len() >= 4);
        assert!(river.len() <= MAX_WALK_STEPS + 1);
        assert!(map.regions[river.mouth()].is_ocean());
        for pair in river.nodes.windows(2) {
            assert!(map.regions[pair[0].region].is_neighbor(pair[1].region));
        }
        // Nothing to merge into, so every step after the source counts
        assert_eq!(river.length_to_merge, river.len() - 1);
        assert!(accept(&map, &river));
    }

    #[test]
    fn test_short_merge_from_land_is_rejected() {
        let mut map = coastal_ramp();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let existing = walk_river(&map, inland_source(&map), &mut rng);
        write_river(&mut map, &existing);

        // A land source two steps off the river, clear of its banks
        let joined = existing.nodes[2].region;
        let (source, side) = map.regions[joined]
            .neighbors
            .iter()
            .copied()
            .filter(|&a| !map.regions[a].is_water() && !map.regions[a].carries_river())
            .find_map(|a| {
                map.regions[a]
                    .neighbors
                    .iter()
                    .copied()
                    .find(|&s| {
                        let r = &map.regions[s];
                        !r.is_water()
                            && !r.carries_river()
                            && !r.neighbors.iter().any(|&n| map.regions[n].carries_river())
                    })
                    .map(|s| (s, a))
            })
            .expect("a region two steps off the river");

        let mut river = River::new(source);
        river.push(side);
        river.length_to_merge = 1;
        for node in &existing.nodes[2..] {
            if !map.regions[node.region].carries_river() {
                river.length_to_merge += 1;
            }
            river.push(node.region);
        }

        assert_eq!(river.length_to_merge, 2);
        assert!(river.len() >= 4);
        assert!(map.regions[river.mouth()].elevation < map.regions[source].elevation);
        assert!(!accept(&map, &river));
    }

    #[test]
    fn test_short_lake_outlet_is_accepted() {
        let mut map = coastal_ramp();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let source = inland_source(&map);
        let mut river = walk_river(&map, source, &mut rng);
        river.length_to_merge = 1;

        map.regions[source].flags |= RegionFlags::WATER;
        assert!(accept(&map, &river));

        map.regions[source].flags.remove(RegionFlags::WATER);
        assert!(!accept(&map, &river));
    }

    #[test]
    fn test_write_river_links_chain() {
        let mut map = coastal_ramp();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let source = map.regions.iter().find(|r| r.point.x > 40.0).unwrap().index;
        let river = walk_river(&map, source, &mut rng);
        write_river(&mut map, &river);

        for pair in river.nodes.windows(2) {
            let from = &map.regions[pair[0].region];
            assert_eq!(from.downriver(), Some(pair[1].region));
            assert_eq!(from.river_magnitude(), 1.0);
            let to = map.regions[pair[1].region].river().unwrap();
            assert!(to.upriver.contains(&pair[0].region));
        }
        let mouth = &map.regions[river.mouth()];
        assert_eq!(mouth.river_magnitude(), 0.0);
        assert!(!mouth.carries_river());
    }

    #[test]
    fn test_merging_river_follows_existing_links() {
        let mut map = coastal_ramp();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let first = map.regions.iter().find(|r| r.point.x > 40.0).unwrap().index;
        let existing = walk_river(&map, first, &mut rng);
        write_river(&mut map, &existing);

        // Start right above the second node of the existing river
        let joined = existing.nodes[1].region;
        let mut river = River::new(first);
        river.push(joined);
        let next = next_step(&map, &river, joined, false, &mut rng);
        assert_eq!(next, existing.nodes[2].region);
    }

    #[test]
    fn test_create_rivers_on_ramp() {
        let mut map = coastal_ramp();
        map.params.features = Features::empty();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let created = create_rivers(&mut map, &mut rng);
        assert_eq!(created, map.rivers.len());

        for river in &map.rivers {
            assert!(river.len() >= 4);
            assert!(map.regions[river.mouth()].is_water());
        }
        for region in &map.regions {
            if let Some(down) = region.downriver() {
                assert!(region.is_neighbor(down));
                assert!(region.carries_river());
            }
        }
    }

    #[test]
    fn test_no_rivers_on_all_water() {
        let mut map = graph_only(64, 42);
        for region in &mut map.regions {
            region.flags = RegionFlags::WATER | RegionFlags::OCEAN;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        assert_eq!(create_rivers(&mut map, &mut rng), 0);
        assert!(map.rivers.is_empty());
    }
}
