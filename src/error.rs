//! Errors returned by `OrderedMap` operations.

use core::fmt;

/// A rejected operation. The map is left unchanged whenever one of these is
/// returned.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MapError {
    /// The key is already present (insert, or rename onto another entry).
    DuplicateKey,
    /// No entry has the requested key.
    KeyNotFound,
    /// The position is not in `0..len`.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::DuplicateKey => f.write_str("key already exists"),
            MapError::KeyNotFound => f.write_str("key doesn't exist"),
            MapError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for map of length {len}")
            }
        }
    }
}

impl std::error::Error for MapError {}
