use crate::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("Path not found: {0}")]
    MissingPath(Path),

    #[error("Cannot address a child of a scalar at {0}")]
    NotAContainer(Path),

    #[error("Expected an array at {0}")]
    NotAnArray(Path),

    #[error("Index {index} out of bounds (len {len}) at {path}")]
    OutOfBounds { path: Path, index: usize, len: usize },

    #[error("Cannot remove the root value")]
    RemoveRoot,
}
