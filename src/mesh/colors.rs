//! Color mapping for biomes

use crate::terrain::Biome;

/// RGBA color type
pub type TerrainColor = [f32; 4];

/// Trait for mapping terrain classifications to colors
pub trait ColorMapper<T> {
    /// Map a terrain classification to an RGBA color
    fn map_color(&self, terrain: &T) -> TerrainColor;
}

/// Default biome palette
#[derive(Debug, Clone, Copy, Default)]
pub struct BiomeColorMapper;

impl ColorMapper<Biome> for BiomeColorMapper {
    fn map_color(&self, biome: &Biome) -> TerrainColor {
        match biome {
            Biome::Ocean => [0.27, 0.27, 0.48, 1.0],
            Biome::Marsh => [0.18, 0.40, 0.40, 1.0],
            Biome::Lake => [0.20, 0.40, 0.60, 1.0],
            Biome::Beach => [0.63, 0.56, 0.47, 1.0],
            Biome::Snow => [1.0, 1.0, 1.0, 1.0],
            Biome::Tundra => [0.73, 0.73, 0.67, 1.0],
            Biome::Bare => [0.53, 0.53, 0.53, 1.0],
            Biome::Scorched => [0.33, 0.33, 0.33, 1.0],
            Biome::Taiga => [0.60, 0.67, 0.47, 1.0],
            Biome::Shrubland => [0.53, 0.60, 0.47, 1.0],
            Biome::TemperateDesert => [0.79, 0.82, 0.61, 1.0],
            Biome::TemperateRainForest => [0.27, 0.53, 0.33, 1.0],
            Biome::TemperateDeciduousForest => [0.40, 0.58, 0.35, 1.0],
            Biome::Grassland => [0.53, 0.67, 0.33, 1.0],
            Biome::TropicalRainForest => [0.20, 0.47, 0.33, 1.0],
            Biome::TropicalSeasonalForest => [0.33, 0.60, 0.27, 1.0],
            Biome::SubtropicalDesert => [0.82, 0.73, 0.55, 1.0],
        }
    }
}

/// Palette with a settable color per biome
///
/// Starts from the [`BiomeColorMapper`] palette.
#[derive(Debug, Clone)]
pub struct CustomColorMapper {
    colors: [TerrainColor; Biome::ALL.len()],
}

impl CustomColorMapper {
    /// Replace the color of one biome
    pub fn with_color(mut self, biome: Biome, color: TerrainColor) -> Self {
        self.colors[usize::from(biome.id())] = color;
        self
    }
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        Self {
            colors: Biome::ALL.map(|biome| BiomeColorMapper.map_color(&biome)),
        }
    }
}

impl ColorMapper<Biome> for CustomColorMapper {
    fn map_color(&self, biome: &Biome) -> TerrainColor {
        self.colors[usize::from(biome.id())]
    }
}
