//! Mesh generation for islands
//!
//! Generates engine-agnostic mesh data from the region polygons of a [`Map`].

mod colors;

pub use colors::{BiomeColorMapper, ColorMapper, CustomColorMapper, TerrainColor};

use glam::Vec3;

use crate::graph::{Region, RegionId};
use crate::map::Map;
use crate::terrain::Biome;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// The map plane is `x`/`z` and height is `y`.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, one shared normal per region polygon
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate mesh from a map with biome coloring
///
/// Each region is triangulated as a fan from its site to its corners in
/// their clockwise order. The site sits at the region's elevation and every
/// corner at its own, both scaled by `max_height`.
pub fn generate_mesh<C>(map: &Map, color_mapper: &C) -> MeshData
where
    C: ColorMapper<Biome>,
{
    generate_mesh_with_visibility(map, color_mapper, None, [0.0, 0.0, 0.0, 1.0])
}

/// Generate mesh with fog of war support
///
/// # Arguments
/// * `map` - The map to generate mesh for
/// * `color_mapper` - Maps biomes to colors
/// * `visible_regions` - Optional slice of visible region IDs. If None, all regions are visible.
/// * `hidden_color` - Color for hidden regions (typically black)
pub fn generate_mesh_with_visibility<C>(
    map: &Map,
    color_mapper: &C,
    visible_regions: Option<&[RegionId]>,
    hidden_color: TerrainColor,
) -> MeshData
where
    C: ColorMapper<Biome>,
{
    let mut mesh = MeshData::default();

    let visible: Option<Vec<bool>> = visible_regions.map(|ids| {
        let mut mask = vec![false; map.region_count()];
        for &id in ids {
            if let Some(slot) = mask.get_mut(id) {
                *slot = true;
            }
        }
        mask
    });

    for region in map.regions() {
        // Skip degenerate polygons
        if region.corners.len() < 3 {
            continue;
        }

        let is_visible = visible
            .as_ref()
            .map(|mask| mask[region.index])
            .unwrap_or(true);
        let color = if is_visible {
            color_mapper.map_color(&region.biome)
        } else {
            hidden_color
        };

        triangulate_region(map, region, color, &mut mesh);
    }

    mesh
}

fn lift(map: &Map, x: f64, y: f64, elevation: f64) -> Vec3 {
    let height = map.params().max_height * elevation;
    Vec3::new(x as f32, height as f32, y as f32)
}

/// Triangulate a single region as a triangle fan
fn triangulate_region(map: &Map, region: &Region, color: TerrainColor, mesh: &mut MeshData) {
    let base_idx = mesh.positions.len() as u32;

    let center = lift(map, region.point.x, region.point.y, region.elevation);
    let rim: Vec<Vec3> = region
        .corners
        .iter()
        .map(|&c| {
            let corner = &map.corners()[c];
            // Corners the elevation pass never reached sit level with the region
            let elevation = if corner.elevation == f64::MAX {
                region.elevation
            } else {
                corner.elevation
            };
            lift(map, corner.point.x, corner.point.y, elevation)
        })
        .collect();

    let mut normal = Vec3::ZERO;
    for i in 0..rim.len() {
        let next = rim[(i + 1) % rim.len()];
        let face = (rim[i] - center).cross(next - center);
        normal += if face.y < 0.0 { -face } else { face };
    }
    let normal = normal.try_normalize().unwrap_or(Vec3::Y);

    mesh.positions.push(center.to_array());
    mesh.normals.push(normal.to_array());
    mesh.colors.push(color);
    for vertex in &rim {
        mesh.positions.push(vertex.to_array());
        mesh.normals.push(normal.to_array());
        mesh.colors.push(color);
    }

    let num_vertices = rim.len();
    for i in 0..num_vertices {
        let next_i = (i + 1) % num_vertices;
        mesh.indices.push(base_idx);
        mesh.indices.push(base_idx + 1 + i as u32);
        mesh.indices.push(base_idx + 1 + next_i as u32);
    }
}
