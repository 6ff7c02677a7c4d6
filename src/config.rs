//! Island parameters and builder
//!
//! This module provides the per-generation configuration for deterministic island maps.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

bitflags! {
    /// Optional terrain features, each independently togglable
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Features: u8 {
        /// Carve a single volcano caldera into a high region
        const VOLCANO = 1 << 0;
        /// Flatten 1-5 randomly grown valleys
        const VALLEYS = 1 << 1;
        /// Gouge downhill canyons from high ground
        const CANYONS = 1 << 2;
        /// Lift land elevations into [0.15, 1.0]
        const CLIFFS = 1 << 3;
        /// Square the redistribution curve
        const SHARPER_MOUNTAINS = 1 << 4;
        /// Cube the redistribution curve
        const EVEN_SHARPER_MOUNTAINS = 1 << 5;
    }
}

/// Configuration for one island generation run
///
/// The same parameters with the same island shape always produce the identical map.
///
/// # Example
///
/// ```rust
/// use island_mapgen::*;
///
/// let params = IslandParametersBuilder::new()
///     .seed(42)
///     .size(256)
///     .unwrap()
///     .features(Features::VOLCANO | Features::CANYONS)
///     .build()
///     .unwrap();
///
/// assert!(params.has_feature(Features::VOLCANO));
/// assert_eq!(params.grid_size(), 32);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IslandParameters {
    /// Seed of the random stream shared by every stochastic stage
    pub seed: u64,

    /// Side length of the square map in world units
    pub size: u32,

    /// Enabled optional features
    pub features: Features,

    /// Fraction of a region's corners that must be water for the region to be water
    pub lake_threshold: f64,

    /// Scale converting normalized elevation into world height units
    pub max_height: f64,

    /// Seed for the noise-based island shape
    pub shape_seed: u64,

    /// Whether a noise pass that drives a region to or below sea level stops the
    /// whole pass (`true`) or only skips that region (`false`)
    pub abort_noise_on_underflow: bool,
}

impl IslandParameters {
    /// Check whether a feature (or every feature of a set) is enabled
    #[inline]
    pub fn has_feature(&self, feature: Features) -> bool {
        self.features.contains(feature)
    }

    /// Number of sample columns (and rows) of the hexagonal lattice
    ///
    /// `floor(sqrt(4 * size))`, so a 64 unit map has a 16 x 16 lattice.
    #[inline]
    pub fn grid_size(&self) -> usize {
        (f64::from(self.size) * 4.0).sqrt().floor() as usize
    }

    /// Spacing between lattice columns in world units
    #[inline]
    pub fn cell_size(&self) -> f64 {
        f64::from(self.size) / self.grid_size().max(1) as f64
    }

    /// Width of the border band used by small-island pruning
    #[inline]
    pub fn border_band(&self) -> f64 {
        f64::from(self.size) * 0.1
    }

    /// Convert a normalized elevation to whole world height units
    #[inline]
    pub fn height_units(&self, elevation: f64) -> i64 {
        (self.max_height * elevation).floor() as i64
    }

    /// Convert a number of world height units back to normalized elevation
    #[inline]
    pub fn from_height_units(&self, units: f64) -> f64 {
        units / self.max_height
    }
}

impl Default for IslandParameters {
    fn default() -> Self {
        IslandParametersBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for creating IslandParameters with validation
///
/// # Example
///
/// ```rust
/// use island_mapgen::*;
///
/// let params = IslandParametersBuilder::new()
///     .seed(7)
///     .lake_threshold(0.3)
///     .unwrap()
///     .max_height(96.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(params.shape_seed, 7);
/// ```
#[derive(Debug, Clone)]
pub struct IslandParametersBuilder {
    seed: Option<u64>,
    size: u32,
    features: Features,
    lake_threshold: f64,
    max_height: f64,
    shape_seed: Option<u64>,
    abort_noise_on_underflow: bool,
}

impl IslandParametersBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - size: 256
    /// - features: none
    /// - lake_threshold: 0.5
    /// - max_height: 128
    /// - shape_seed: Same as seed
    /// - abort_noise_on_underflow: true
    pub fn new() -> Self {
        Self {
            seed: None,
            size: 256,
            features: Features::empty(),
            lake_threshold: 0.5,
            max_height: 128.0,
            shape_seed: None,
            abort_noise_on_underflow: true,
        }
    }

    /// Set the seed of the generation random stream
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the map side length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size < 16 (the lattice would be too small to
    /// hold an island)
    pub fn size(mut self, size: u32) -> Result<Self> {
        if size < 16 {
            return Err(MapError::InvalidConfig(format!(
                "map size must be >= 16 (got {})",
                size
            )));
        }
        self.size = size;
        Ok(self)
    }

    /// Replace the enabled feature set
    pub fn features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Enable one more feature
    pub fn feature(mut self, feature: Features) -> Self {
        self.features |= feature;
        self
    }

    /// Set the lake threshold ratio
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 0 < threshold <= 1
    pub fn lake_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(MapError::InvalidConfig(format!(
                "lake threshold must be in (0, 1] (got {})",
                threshold
            )));
        }
        self.lake_threshold = threshold;
        Ok(self)
    }

    /// Set the world height scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if max_height <= 0 or is not finite
    pub fn max_height(mut self, max_height: f64) -> Result<Self> {
        if !(max_height.is_finite() && max_height > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "max height must be positive (got {})",
                max_height
            )));
        }
        self.max_height = max_height;
        Ok(self)
    }

    /// Set a separate seed for the island shape noise
    ///
    /// If not set, the shape seed matches the generation seed.
    pub fn shape_seed(mut self, seed: u64) -> Self {
        self.shape_seed = Some(seed);
        self
    }

    /// Choose whether an underflowing noise step aborts the whole pass
    pub fn abort_noise_on_underflow(mut self, abort: bool) -> Self {
        self.abort_noise_on_underflow = abort;
        self
    }

    /// Build the parameters
    ///
    /// If no seed was provided, a random seed is drawn.
    pub fn build(self) -> Result<IslandParameters> {
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> IslandParameters {
        let seed = self.seed.unwrap_or_else(rand::random);
        IslandParameters {
            seed,
            size: self.size,
            features: self.features,
            lake_threshold: self.lake_threshold,
            max_height: self.max_height,
            shape_seed: self.shape_seed.unwrap_or(seed),
            abort_noise_on_underflow: self.abort_noise_on_underflow,
        }
    }
}

impl Default for IslandParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}
