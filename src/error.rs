//! Error types for richdoc.

use crate::node::Key;
use std::fmt;

/// Result type alias for richdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for document and selection operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A selection or range names a key that is not in the document.
    UnknownKey { key: Key },
    /// A point offset exceeds the length of its Text node.
    OffsetOutOfBounds { key: Key, offset: usize, len: usize },
    /// The key resolves to a container where a Text node was required.
    NotText { key: Key },
    /// The key resolves to a Text node where a container was required.
    NotContainer { key: Key },
    /// Plain-data input violates a structural invariant.
    InvalidDocument(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey { key } => write!(f, "no node with key {key} in document"),
            Self::OffsetOutOfBounds { key, offset, len } => {
                write!(
                    f,
                    "offset {offset} out of bounds for text node {key} of length {len}"
                )
            }
            Self::NotText { key } => write!(f, "node {key} is not a text node"),
            Self::NotContainer { key } => write!(f, "node {key} is not a container"),
            Self::InvalidDocument(reason) => write!(f, "invalid document: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownKey { key: Key::new(7) };
        assert!(err.to_string().contains("k7"));

        let err = Error::OffsetOutOfBounds {
            key: Key::new(2),
            offset: 10,
            len: 4,
        };
        assert!(err.to_string().contains("offset 10"));
        assert!(err.to_string().contains("length 4"));

        let err = Error::InvalidDocument("empty container".to_string());
        assert!(err.to_string().contains("empty container"));
    }
}
