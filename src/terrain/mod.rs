//! Terrain stages of the generation pipeline
//!
//! Each stage is a free function over [`Map`](crate::map::Map). The pipeline
//! order lives in [`Map::generate_with`](crate::map::Map::generate_with);
//! stages assume everything before them has already run.

mod biome;
pub(crate) mod carve;
pub(crate) mod downslope;
pub(crate) mod elevation;
pub(crate) mod lakes;
pub(crate) mod moisture;
pub(crate) mod ordering;
mod perlin;
mod shape;
pub(crate) mod water;

pub(crate) use biome::assign_biomes;
pub use biome::Biome;
pub use perlin::{sample_perlin_2d, sample_perlin_fbm, PerlinConfig};
pub use shape::{IslandShape, PerlinIslandShape};
