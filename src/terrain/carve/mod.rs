//! Feature carvers
//!
//! Stochastic passes that walk the region graph and reshape elevation and
//! flags along the way. They run in a fixed order and share the generation
//! random stream, so their output depends on everything drawn before them.

mod canyon;
mod noise;
mod river;
mod valley;
mod volcano;

pub(crate) use canyon::create_canyons;
pub(crate) use noise::{assign_hilly_noise, assign_sloped_noise};
pub(crate) use river::create_rivers;
pub(crate) use valley::create_valleys;
pub(crate) use volcano::create_volcano;

use rand::Rng;

/// Maximum number of steps of a river or canyon walk
pub(crate) const MAX_WALK_STEPS: usize = 250;

/// Uniform pick from a non-empty candidate list
///
/// A single candidate is returned without drawing from the stream.
fn pick<R: Rng + ?Sized>(candidates: &[usize], rng: &mut R) -> Option<usize> {
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        len => Some(candidates[rng.gen_range(0..len)]),
    }
}
