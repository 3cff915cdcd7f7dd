//! Error types for tag payload parsing.

use thiserror::Error;

/// Errors produced when a tag payload does not match the tag grammar.
///
/// Both variants indicate a bug in the code that produced the tag, not a
/// runtime condition. Callers propagate them; nothing retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The payload is neither a bare name nor a parenthesized tag.
    #[error("malformed tag: expected `name` or `(name (key val)...)`")]
    MalformedTag,

    /// An attribute element is not a two-atom list.
    #[error("malformed arg: expected `(key val)`")]
    MalformedArg,
}

/// Result type for tag parsing.
pub type Result<T> = std::result::Result<T, TagError>;
