//! Error types for blob analysis and rendering.

use thiserror::Error;

use crate::blob::Label;
use crate::image::{ColorFormat, ImageDesc};

/// Which buffer of an operation failed a format check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Label,
    Source,
    Destination,
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRole::Label => write!(f, "label"),
            ImageRole::Source => write!(f, "source"),
            ImageRole::Destination => write!(f, "destination"),
        }
    }
}

/// Errors reported by blob operations.
///
/// Every operation validates its inputs before touching any buffer or
/// registry, so an `Err` always means nothing observable changed.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Invalid {role} image format: expected {expected}, got {actual}")]
    Format {
        role: ImageRole,
        expected: ColorFormat,
        actual: ColorFormat,
    },

    #[error("Image dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: ImageDesc,
        actual: ImageDesc,
    },

    #[error("Central moments of blob {label} are not computed")]
    CentralMomentsUnavailable { label: Label },

    #[error("Blob {label} has zero area")]
    DegenerateRegion { label: Label },

    #[error("Label 0 is reserved for background")]
    BackgroundLabel,

    #[error("Blob {label} has an empty bounding box")]
    InvalidBoundingBox { label: Label },

    #[error("Bounding box of blob {label} exceeds the {width}x{height} label image")]
    BoundingBoxOutOfBounds { label: Label, width: u32, height: u32 },

    #[error("Image data length mismatch: expected {expected} bytes, got {actual}")]
    InvalidImageData { expected: usize, actual: usize },

    #[error("Invalid render options: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
