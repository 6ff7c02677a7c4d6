//! Procedural island maps on a Voronoi graph
//!
//! A standalone library that builds an island on the Voronoi diagram of a
//! jittered hexagonal lattice, then carves lakes, rivers, canyons, valleys
//! and a volcano into it through seeded graph walks.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use island_mapgen::*;
//!
//! // Generate an island
//! let params = IslandParametersBuilder::new()
//!     .seed(42)
//!     .size(1024).unwrap()
//!     .features(Features::VOLCANO | Features::CANYONS | Features::VALLEYS)
//!     .build().unwrap();
//!
//! let map = Map::generate(params).unwrap();
//! println!("{} regions, {} rivers", map.region_count(), map.rivers().len());
//!
//! // Generate mesh for rendering
//! let mesh = generate_mesh(&map, &BiomeColorMapper);
//! println!("Generated {} triangles", mesh.triangle_count());
//!
//! // Save to a tag tree for the host to encode
//! let tag = map.write_to_tag();
//! let restored = Map::read_from_tag(&tag).unwrap();
//! assert_eq!(restored.region_count(), map.region_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) nearest-region lookups using a KD-tree
//! - `serde`: Enables serialization support for parameters, graph entities and tags

// Modules
pub mod config;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod graph;
pub mod map;
pub mod mesh;
pub mod persist;
pub mod terrain;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use config::{Features, IslandParameters, IslandParametersBuilder};
pub use error::{MapError, Result};
pub use generation::{DualEdge, DualGraphProvider, VoronoiceProvider};
pub use geometry::{Bounds, Point};
pub use graph::{
    Attribute, AttributeKind, Canyon, CanyonNode, Corner, CornerFlags, CornerId, Edge, EdgeId,
    Lake, Region, RegionFlags, RegionId, River, RiverAttribute, RiverNode,
};
pub use map::Map;
pub use mesh::{
    generate_mesh, generate_mesh_with_visibility, BiomeColorMapper, ColorMapper,
    CustomColorMapper, MeshData, TerrainColor,
};
pub use persist::{Tag, TagCompound};
pub use terrain::{Biome, IslandShape, PerlinConfig, PerlinIslandShape};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;
