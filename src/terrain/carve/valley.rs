//! Valleys

use std::collections::VecDeque;

use rand::Rng;

use crate::config::Features;
use crate::graph::RegionFlags;
use crate::map::Map;

/// Minimum elevation of a valley seed
const VALLEY_ELEVATION: f64 = 0.4;

/// Flatten 1 to 5 randomly grown valleys
///
/// Each valley grows breadth-first from a seed. Past its soft size cap a
/// region is accepted with probability `1 / (1 + size - cap)`. Inland lakes
/// touched by the valley are dropped just below its floor.
///
/// Returns the number of valleys carved.
pub(crate) fn create_valleys<R: Rng + ?Sized>(map: &mut Map, rng: &mut R) -> usize {
    if !map.params.has_feature(Features::VALLEYS) {
        return 0;
    }

    let candidates = map.regions_above(VALLEY_ELEVATION);
    if candidates.is_empty() {
        return 0;
    }

    let attempts = 1 + rng.gen_range(0..5);
    let mut carved = 0;

    for _ in 0..attempts {
        let min_size = 20 + rng.gen_range(0..30usize);
        let mid = candidates[rng.gen_range(0..candidates.len())];
        if map.regions[mid].is_water() {
            continue;
        }

        let mut valley = vec![mid];
        let mut in_valley = vec![false; map.regions.len()];
        let mut queued = vec![false; map.regions.len()];
        let mut lakes_to_drop: Vec<usize> = Vec::new();
        let mut min_elevation = f64::MAX;
        in_valley[mid] = true;

        let mut queue = VecDeque::new();
        for &n in &map.regions[mid].neighbors {
            queued[n] = true;
            queue.push_back(n);
        }

        while let Some(c) = queue.pop_front() {
            queued[c] = false;
            if in_valley[c] {
                continue;
            }

            let accept = valley.len() <= min_size
                || rng.gen_range(0..1 + valley.len() - min_size) == 0;
            if !accept {
                continue;
            }

            let region = &map.regions[c];
            if region.is_lake() {
                if let Some(lake) = map.lake_index_of(c) {
                    if !lakes_to_drop.contains(&lake) {
                        lakes_to_drop.push(lake);
                    }
                }
            } else if region.is_ocean() {
                continue;
            }

            valley.push(c);
            in_valley[c] = true;
            min_elevation = min_elevation.min(region.elevation);
            for &n in &region.neighbors {
                if !queued[n] && !in_valley[n] {
                    queued[n] = true;
                    queue.push_back(n);
                }
            }
        }

        if valley.len() < min_size {
            continue;
        }

        let floor_jitter = map.params.from_height_units(5.0);
        let floor_drop = map.params.from_height_units(2.0);
        for &id in &valley {
            let region = &mut map.regions[id];
            region.elevation = min_elevation * 0.8 - floor_drop + rng.gen::<f64>() * floor_jitter;
            region.set_flag(RegionFlags::VALLEY, true);
        }
        for &lake in &lakes_to_drop {
            for i in 0..map.lakes[lake].len() {
                let id = map.lakes[lake].regions()[i];
                map.regions[id].elevation = min_elevation * 0.79;
            }
        }

        let p = map.regions[mid].point;
        log::info!("valley of {} regions at ({:.1}, {:.1})", valley.len(), p.x, p.y);
        carved += 1;
    }

    carved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::graph_only;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_valleys_on_plateau() {
        let mut map = graph_only(64, 42);
        map.params.features = Features::VALLEYS;
        for region in &mut map.regions {
            region.elevation = 0.5;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let carved = create_valleys(&mut map, &mut rng);
        assert!(carved >= 1);

        let valley: Vec<_> = map.regions.iter().filter(|r| r.is_valley()).collect();
        assert!(valley.len() >= 20);
        // Overlapping valleys can only deepen each other
        let ceiling = 0.5 * 0.8 - map.params.from_height_units(2.0)
            + map.params.from_height_units(5.0);
        for region in valley {
            assert!(region.elevation > 0.2);
            assert!(region.elevation <= ceiling + 1e-12);
        }
    }

    #[test]
    fn test_valleys_never_take_ocean() {
        let mut map = graph_only(64, 42);
        map.params.features = Features::VALLEYS;
        for region in &mut map.regions {
            region.elevation = 0.5;
            if region.point.x < 32.0 {
                region.flags = RegionFlags::WATER | RegionFlags::OCEAN;
                region.elevation = 0.0;
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        create_valleys(&mut map, &mut rng);
        assert!(map.regions.iter().all(|r| !(r.is_valley() && r.is_ocean())));
    }

    #[test]
    fn test_no_valleys_when_disabled_or_low() {
        let mut map = graph_only(64, 42);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        map.params.features = Features::VALLEYS;
        assert_eq!(create_valleys(&mut map, &mut rng), 0, "flat map has no candidates");

        map.params.features = Features::empty();
        for region in &mut map.regions {
            region.elevation = 0.5;
        }
        assert_eq!(create_valleys(&mut map, &mut rng), 0);
    }
}
