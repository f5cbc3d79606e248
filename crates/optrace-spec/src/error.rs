//! Error types for specification lookups.

use thiserror::Error;

/// Errors in the optical specification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    /// Index past the end of a collection.
    #[error("{collection} index {index} out of range (len {len})")]
    OutOfRange {
        /// Which collection was indexed.
        collection: &'static str,
        /// The offending index.
        index: usize,
        /// Length of the collection.
        len: usize,
    },

    /// A collection that must keep at least one entry would become empty.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Result type for specification operations.
pub type Result<T> = std::result::Result<T, SpecError>;

pub(crate) fn check_index(collection: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(SpecError::OutOfRange {
            collection,
            index,
            len,
        })
    }
}
