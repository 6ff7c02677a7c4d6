//! Elevation noise passes
//!
//! Both passes stop at the first region pushed to zero or below unless
//! `abort_noise_on_underflow` is turned off, in which case only that region
//! is skipped.

use rand::Rng;

use crate::map::Map;
use crate::terrain::downslope::{highest_neighbor, lowest_neighbor};

/// Nudge about half of the dry inland regions toward a neighbor
///
/// 70% of the nudged regions slide toward their lowest neighbor, the rest
/// climb toward their highest.
pub(crate) fn assign_sloped_noise<R: Rng + ?Sized>(map: &mut Map, rng: &mut R) {
    let abort = map.params.abort_noise_on_underflow;

    for id in 0..map.regions.len() {
        let region = &map.regions[id];
        if region.is_canyon()
            || region.is_coast()
            || region.is_water()
            || region.river().is_some()
        {
            continue;
        }
        let near_water = region.neighbors.iter().any(|&n| map.regions[n].is_water());
        if region.is_lava() || near_water {
            continue;
        }
        if rng.gen_range(0..100) >= 50 {
            continue;
        }

        let e = region.elevation;
        let elevation = if rng.gen_range(0..100) < 70 {
            let low = map.regions[lowest_neighbor(map, id)].elevation;
            e - rng.gen::<f64>() * (e - low)
        } else {
            let high = map.regions[highest_neighbor(map, id)].elevation;
            e + rng.gen::<f64>() * (high - e)
        };
        let elevation = elevation.clamp(0.0, 1.0);
        map.regions[id].elevation = elevation;

        if elevation <= 0.0 && abort {
            log::debug!("sloped noise stopped at region {}", id);
            return;
        }
    }
}

/// Raise about one in ten dry regions toward the peak above them
///
/// The raised region then lifts its dry neighbors by a random share of the
/// difference. Valley regions rise five times less.
pub(crate) fn assign_hilly_noise<R: Rng + ?Sized>(map: &mut Map, rng: &mut R) {
    let abort = map.params.abort_noise_on_underflow;

    for id in 0..map.regions.len() {
        let region = &map.regions[id];
        if region.is_canyon() || region.is_coast() {
            continue;
        }
        if rng.gen_range(0..100) >= 10 {
            continue;
        }
        if region.is_water() || region.river().is_some() {
            continue;
        }

        let mut highest = id;
        for _ in 0..4 {
            highest = highest_neighbor(map, highest);
        }
        let diff = map.regions[highest].elevation - region.elevation;
        let multiplier = if region.is_valley() { 0.1 } else { 0.5 };
        let elevation = region.elevation + diff * (multiplier + multiplier * rng.gen::<f64>());
        map.regions[id].elevation = elevation;

        if elevation <= 0.0 {
            if abort {
                log::debug!("hilly noise stopped at region {}", id);
                return;
            }
            continue;
        }

        for i in 0..map.regions[id].neighbors.len() {
            let n = map.regions[id].neighbors[i];
            let neighbor = &mut map.regions[n];
            if neighbor.is_lava()
                || neighbor.is_canyon()
                || neighbor.is_coast()
                || neighbor.river().is_some()
                || neighbor.is_water()
            {
                continue;
            }
            neighbor.elevation += ((elevation - neighbor.elevation) * rng.gen::<f64>()).max(0.0);
            if neighbor.elevation <= 0.0 && abort {
                log::debug!("hilly noise stopped at region {}", n);
                return;
            }
        }
    }
}
