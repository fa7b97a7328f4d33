//! Error types for BuildForge

use thiserror::Error;

use crate::attribute::AttrKey;

/// Main error type for BuildForge operations
#[derive(Debug, Error)]
pub enum BuildForgeError {
    /// Error in optimizer configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The modifier graph contains a cycle through the given attribute
    #[error("Modifier graph has a cycle through `{0}`")]
    CyclicModifier(AttrKey),

    /// More distinct filtered sets than a set signature can hold
    #[error("Too many set filters: {0} distinct sets (at most 64 supported)")]
    TooManySetFilters(usize),

    /// The optimization request cannot be run as given
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A background run reported a failure
    #[error("Optimization failed: {0}")]
    Failed(String),

    /// The background optimizer thread could not be started
    #[error("Failed to spawn optimizer thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type alias for BuildForge operations
pub type Result<T> = std::result::Result<T, BuildForgeError>;
