//! Error types for assembly editing.

use thiserror::Error;

/// Structural errors in an optical assembly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
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

    /// The stop must be an optical surface, not the object or image.
    #[error("surface {index} cannot be the stop (image is surface {image_index})")]
    InvalidStop {
        /// Requested stop index.
        index: usize,
        /// Index of the image surface.
        image_index: usize,
    },

    /// Removing this surface would leave no optical surface.
    #[error("cannot remove surface {0}")]
    CannotRemove(usize),
}

/// Result type for assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;

pub(crate) fn check_index(collection: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(AssemblyError::OutOfRange {
            collection,
            index,
            len,
        })
    }
}
