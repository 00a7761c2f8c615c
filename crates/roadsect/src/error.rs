//! Error types for cross-section generation.

use thiserror::Error;

/// Errors raised when input is rejected at the pipeline boundary.
#[derive(Error, Debug)]
pub enum SectionError {
    /// Invalid section settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings file could not be parsed.
    #[error("failed to parse settings: {0}")]
    Config(#[from] toml::de::Error),

    /// The two anchor points have no horizontal separation.
    #[error("cut plane anchors must be horizontally separated")]
    DegeneratePlane,

    /// A triangle has coincident vertices.
    #[error("triangle {index} has coincident vertices")]
    DegenerateTriangle {
        /// Index of the offending triangle.
        index: usize,
    },

    /// An index buffer refers past the end of the vertex buffer.
    #[error("vertex index {index} out of range for {len} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of vertices available.
        len: usize,
    },

    /// Alignment data is unusable.
    #[error("invalid alignment: {0}")]
    InvalidAlignment(String),

    /// Requested station is outside the alignment.
    #[error("station {0} is outside the alignment")]
    StationOutOfRange(f64),
}

/// Result type for cross-section operations.
pub type Result<T> = std::result::Result<T, SectionError>;
