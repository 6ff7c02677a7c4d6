//! Canyons

use rand::Rng;

use super::{pick, MAX_WALK_STEPS};
use crate::config::Features;
use crate::graph::{Canyon, RegionFlags, RegionId};
use crate::map::Map;

/// Minimum elevation of a canyon start
const CANYON_ELEVATION: f64 = 0.5;

/// Number of start draws
const START_DRAWS: usize = 100;

/// Outcome of one canyon step
enum Step {
    /// Walk on to this region
    Next(RegionId),
    /// Join an existing canyon at this region and stop
    Join(RegionId),
    /// Stop here
    Stop,
}

/// Cut downhill canyons from high ground
///
/// Returns the canyons that were carved.
pub(crate) fn create_canyons<R: Rng + ?Sized>(map: &mut Map, rng: &mut R) -> Vec<Canyon> {
    let mut canyons = Vec::new();
    if !map.params.has_feature(Features::CANYONS) {
        return canyons;
    }

    let high = map.regions_above(CANYON_ELEVATION);
    if high.is_empty() {
        return canyons;
    }

    for start in draw_starts(map, &high, rng) {
        if map.regions[start].is_water() {
            continue;
        }

        let canyon = walk_canyon(map, start, rng);
        if canyon.len() <= 2 {
            continue;
        }

        let min = canyon.min_elevation;
        for node in &canyon.nodes {
            let region = &mut map.regions[node.region];
            if !region.is_canyon() {
                let depth = (region.elevation - min) * 0.5;
                region.elevation = min.max(region.elevation - depth.min(0.2));
            }
            region.set_flag(RegionFlags::CANYON, true);
        }
        canyons.push(canyon);
    }

    log::debug!("carved {} canyons", canyons.len());
    canyons
}

/// Draw canyon starts, dropping a draw that borders an earlier start
///
/// A region drawn twice is kept twice.
fn draw_starts<R: Rng + ?Sized>(map: &Map, high: &[RegionId], rng: &mut R) -> Vec<RegionId> {
    let mut starts: Vec<RegionId> = Vec::new();
    for _ in 0..START_DRAWS {
        let c = high[rng.gen_range(0..high.len())];
        if !map.regions[c].neighbors.iter().any(|n| starts.contains(n)) {
            starts.push(c);
        }
    }
    starts
}

fn walk_canyon<R: Rng + ?Sized>(map: &Map, start: RegionId, rng: &mut R) -> Canyon {
    let mut canyon = Canyon::new();
    let mut current = start;

    for _ in 0..=MAX_WALK_STEPS {
        if map.regions[current].is_water() {
            break;
        }
        canyon.push(current, map.regions[current].elevation);

        match next_step(map, current, rng) {
            Step::Next(next) => {
                if next == current || canyon.contains(next) {
                    break;
                }
                current = next;
            }
            Step::Join(next) => {
                canyon.push(next, map.regions[next].elevation);
                break;
            }
            Step::Stop => break,
        }
    }

    canyon
}

fn next_step<R: Rng + ?Sized>(map: &Map, id: RegionId, rng: &mut R) -> Step {
    let region = &map.regions[id];
    let units = map.params.height_units(region.elevation);
    let lower: Vec<RegionId> = region
        .neighbors
        .iter()
        .copied()
        .filter(|&n| map.params.height_units(map.regions[n].elevation) < units)
        .collect();

    if let Some(&joined) = lower.iter().find(|&&n| map.regions[n].is_canyon()) {
        return Step::Join(joined);
    }
    if lower.iter().any(|&n| map.regions[n].is_water()) {
        return Step::Stop;
    }

    match pick(&lower, rng).or(region.downslope) {
        Some(next) if next != id => Step::Next(next),
        _ => Step::Stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::graph_only;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ramp() -> Map {
        let mut map = graph_only(64, 42);
        map.params.features = Features::CANYONS;
        for region in &mut map.regions {
            region.elevation = region.point.x / 64.0;
        }
        map
    }

    #[test]
    fn test_canyons_descend_and_flag() {
        let mut map = ramp();
        let before: Vec<f64> = map.regions.iter().map(|r| r.elevation).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let canyons = create_canyons(&mut map, &mut rng);
        assert!(!canyons.is_empty());

        for canyon in &canyons {
            assert!(canyon.len() > 2);
            assert!(canyon.len() <= MAX_WALK_STEPS + 2);
            for node in &canyon.nodes {
                let region = &map.regions[node.region];
                assert!(region.is_canyon());
                assert!(region.elevation <= before[node.region] + 1e-12);
                assert!(region.elevation >= canyon.min_elevation - 1e-12);
            }
        }
    }

    #[test]
    fn test_canyon_stops_at_water() {
        let mut map = ramp();
        for region in &mut map.regions {
            if region.point.x < 40.0 {
                region.flags = RegionFlags::WATER | RegionFlags::OCEAN;
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for canyon in create_canyons(&mut map, &mut rng) {
            for node in &canyon.nodes {
                assert!(!map.regions[node.region].is_water());
            }
        }
    }

    #[test]
    fn test_repeated_start_draws_are_kept() {
        let mut map = graph_only(64, 42);
        map.regions[100].elevation = 0.9;
        let high = map.regions_above(CANYON_ELEVATION);
        assert_eq!(high, vec![100]);

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let starts = draw_starts(&map, &high, &mut rng);
        assert_eq!(starts.len(), START_DRAWS);
        assert!(starts.iter().all(|&s| s == 100));
    }

    #[test]
    fn test_start_next_to_earlier_start_is_dropped() {
        let map = graph_only(64, 42);
        let a = 100;
        let b = map.regions[a].neighbors[0];
        let high = vec![a, b];

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let starts = draw_starts(&map, &high, &mut rng);
        let first = starts[0];
        assert!(starts.iter().all(|&s| s == first));
    }

    #[test]
    fn test_no_canyons_on_flat_ground() {
        let mut map = graph_only(64, 42);
        map.params.features = Features::CANYONS;
        for region in &mut map.regions {
            region.elevation = 0.7;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert!(create_canyons(&mut map, &mut rng).is_empty());
        assert!(map.regions.iter().all(|r| !r.is_canyon()));
    }
}
