//! Error types for the render crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while producing image derivatives.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A source image could not be opened or decoded.
    #[error("failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Encoding an image failed.
    #[error("failed to encode image: {0}")]
    ImageEncode(#[from] image::ImageError),

    /// A filesystem operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The image has a zero dimension.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// No target widths were requested, or one of them is zero.
    #[error("invalid target widths: {0:?}")]
    InvalidWidths(Vec<u32>),

    /// JPEG quality outside 1-100.
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    /// Another source in the same batch already claimed this file stem.
    #[error(
        "{} has the same file stem as {}; their derivatives would collide",
        .path.display(),
        .first.display()
    )]
    DuplicateStem { path: PathBuf, first: PathBuf },

    /// The source path has no file name to derive output names from.
    #[error("source path has no file stem: {}", .0.display())]
    MissingStem(PathBuf),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// A name that does not match any known preset or format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{name}`; expected one of: {expected}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub name: String,
    pub expected: &'static str,
}
