//! Error types for pagescan.

use std::io;
use thiserror::Error;

/// Result type alias for pagescan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while editing, recognizing or serializing pages.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A box, layout or page record is malformed.
    #[error("Invalid record: {0}")]
    Record(String),

    /// A record names a box type this version does not know.
    #[error("Unknown box type: {0}")]
    UnknownBoxType(String),

    /// Box index is out of range.
    #[error("Box index {index} is out of range (layout has {len} boxes)")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Number of boxes in the layout
        len: usize,
    },

    /// No box with the given id exists in the layout.
    #[error("Box not found: {0}")]
    BoxNotFound(String),

    /// The page has no image reference.
    #[error("No image path set for page")]
    NoImage,

    /// The page has no recognition backend.
    #[error("No recognition backend set for page")]
    NoBackend,

    /// The recognition backend reported a failure.
    #[error("Recognition backend error: {0}")]
    Backend(String),

    /// Image preprocessing failed.
    #[error("Image processing error: {0}")]
    Image(String),

    /// Settings could not be loaded or are inconsistent.
    #[error("Settings error: {0}")]
    Settings(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "raster")]
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Image(err.to_string()),
        }
    }
}
