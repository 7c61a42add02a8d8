//! Error types for island map generation

use std::fmt;

/// Errors that can occur during map generation or queries
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// The triangulation provider could not produce a subdivision
    GenerationFailed(String),
    /// A face's half-edge ring does not close (`next` chain broken)
    BrokenHalfEdgeRing {
        /// Index of the offending face in the subdivision
        face: usize,
    },
    /// Requested center ID does not exist
    CenterNotFound(usize),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            MapError::GenerationFailed(msg) => write!(f, "generation failed: {}", msg),
            MapError::BrokenHalfEdgeRing { face } => {
                write!(f, "half-edge ring of face {} does not close", face)
            }
            MapError::CenterNotFound(id) => write!(f, "center not found: {}", id),
        }
    }
}

impl std::error::Error for MapError {}

/// Result type alias for map operations
pub type Result<T> = std::result::Result<T, MapError>;
