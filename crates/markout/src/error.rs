//! Error types for tag rendering.

use markout_tags::TagError;
use thiserror::Error;

/// Errors raised while rendering tagged output.
#[derive(Debug, Error)]
pub enum Error {
    /// A tag payload did not match the tag grammar.
    #[error(transparent)]
    Tag(#[from] TagError),

    /// Writing to the underlying output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mode name that is not one of `html`, `text`, `attr`, `none`.
    #[error("unknown tag mode: {0}")]
    UnknownMode(String),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;
