//! Error types for island map generation

use thiserror::Error;

/// Errors that can occur during map generation, queries or loading
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dual graph provider could not produce a usable graph
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// A point query was made against a map with no regions or corners
    #[error("map graph is empty")]
    EmptyGraph,

    /// A stored cross reference points outside its arena
    #[error("invalid {kind} reference {index} (only {len} present)")]
    InvalidReference {
        /// Arena the reference points into ("region", "corner" or "edge")
        kind: &'static str,
        /// Index that was read
        index: i64,
        /// Length of the arena
        len: usize,
    },

    /// A required key is absent from a tag compound
    #[error("missing tag: {0}")]
    MissingTag(String),

    /// A tag exists but holds a different type
    #[error("tag {key} is not a {expected}")]
    TagType {
        /// Key that was read
        key: String,
        /// Type the reader asked for
        expected: &'static str,
    },

    /// A stored biome id has no matching biome
    #[error("unknown biome id: {0}")]
    UnknownBiome(u8),
}

/// Result type alias for map operations
pub type Result<T> = std::result::Result<T, MapError>;
