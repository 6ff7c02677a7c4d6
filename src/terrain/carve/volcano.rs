//! Volcano caldera

use rand::Rng;

use crate::config::Features;
use crate::graph::{RegionFlags, RegionId};
use crate::map::Map;

/// Minimum elevation of a volcano's center
const VOLCANO_ELEVATION: f64 = 0.8;

/// Turn one high region and its neighbors into a lava caldera
///
/// Returns the center of the caldera, or `None` when the feature is off or no
/// region is high enough.
pub(crate) fn create_volcano<R: Rng + ?Sized>(map: &mut Map, rng: &mut R) -> Option<RegionId> {
    if !map.params.has_feature(Features::VOLCANO) {
        return None;
    }

    let candidates = map.regions_above(VOLCANO_ELEVATION);
    if candidates.is_empty() {
        log::debug!("no region reaches {} for a volcano", VOLCANO_ELEVATION);
        return None;
    }
    let mid = candidates[rng.gen_range(0..candidates.len())];

    let mut caldera = vec![mid];
    caldera.extend(map.regions[mid].neighbors.iter().copied());

    let lowest = caldera
        .iter()
        .map(|&c| map.regions[c].elevation)
        .fold(f64::MAX, f64::min);

    for &c in &caldera {
        let region = &mut map.regions[c];
        region.remove_river();
        region.set_flag(RegionFlags::WATER, false);
        region.set_flag(RegionFlags::LAVA, true);
        region.elevation = lowest * 0.85;
    }

    let p = map.regions[mid].point;
    log::info!("volcano at ({:.1}, {:.1})", p.x, p.y);
    Some(mid)
}
