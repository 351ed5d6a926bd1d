//! Error types for volume encoding and delivery.

use thiserror::Error;

/// Result type alias using DeliveryError.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Main error type for encoding and delivery operations.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Sample count does not match the declared grid volume.
    #[error("Shape mismatch: grid {size:?} holds {expected} samples, got {actual}")]
    ShapeMismatch {
        size: [u16; 3],
        expected: usize,
        actual: usize,
    },

    /// Grid volume or a single axis exceeds the format limits.
    #[error("Grid too large: {0}")]
    GridTooLarge(String),

    /// Normalization range is inverted, empty or not finite.
    #[error("Invalid range: [{lo}, {hi}]")]
    InvalidRange { lo: f32, hi: f32 },

    /// A sample has no value of the requested kind.
    #[error("Missing values: sample {index} has no {expected} value")]
    MissingValues { index: usize, expected: &'static str },

    /// Bytes are not a well-formed VF file.
    #[error("Invalid VF data: {0}")]
    InvalidFormat(String),

    /// Selection and active collection yield nothing to export.
    #[error("Nothing to deliver: {0}")]
    NothingToDeliver(String),

    /// Object was routed to a volume format but carries no volume attributes.
    #[error("Object '{0}' has no volume attributes")]
    MissingVolume(String),

    /// Delivery settings are inconsistent.
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// The host exporter failed to write a file.
    #[error("Host export error: {0}")]
    Host(String),

    /// Failed to export a file.
    #[error("Export error: {0}")]
    Export(String),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
