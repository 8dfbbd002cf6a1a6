//! Error types for the DSP bridge

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// A required buffer handle was null.
    #[error("null buffer handle")]
    NullBuffer,

    /// A buffer did not have the length the operation requires.
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The pitch method identifier is not known to any collaborator.
    #[error("unknown pitch method: {0:?}")]
    UnknownMethod(String),

    /// A collaborator refused to construct an analysis object
    /// (e.g. filter design outside the valid frequency range).
    #[error("collaborator construction failed: {0}")]
    Collaborator(String),

    /// The allocator could not reserve the requested sample count.
    #[error("failed to allocate {0} samples")]
    Allocation(usize),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
