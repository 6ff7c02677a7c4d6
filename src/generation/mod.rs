//! Graph generation
//!
//! Samples the hexagonal lattice, computes its Voronoi/Delaunay dual and
//! links the result into region, corner and edge arenas.

mod builder;
mod dual;
mod hexagon;

pub use builder::{build_graph, GraphParts};
pub use dual::{DualEdge, DualGraphProvider, VoronoiceProvider};
pub use hexagon::generate_hexagon_points;

use rand::Rng;

use crate::config::IslandParameters;
use crate::error::{MapError, Result};
use crate::geometry::Bounds;

/// Generate the linked graph of an island (geometry only, no terrain)
pub fn generate_graph<P, R>(params: &IslandParameters, provider: &P, rng: &mut R) -> Result<GraphParts>
where
    P: DualGraphProvider + ?Sized,
    R: Rng + ?Sized,
{
    let bounds = Bounds::new(f64::from(params.size));

    // Step 1: Sample lattice sites
    let sites = generate_hexagon_points(params.grid_size(), bounds.size, rng);

    // Step 2: Compute the dual graph
    let dual = provider.build_dual(&sites, bounds)?;

    // Step 3: Link it
    let parts = build_graph(&sites, &dual, bounds);
    if parts.corners.is_empty() {
        return Err(MapError::GenerationFailed(
            "dual graph produced no corners".to_string(),
        ));
    }
    Ok(parts)
}
