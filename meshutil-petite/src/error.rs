//! Error types for the meshutil-petite crate.
//!
//! Only coding errors surface as an [`Error`]. Structurally invalid topology
//! (degenerate faces, index overruns) never fails an operation; it is counted
//! in a [`TopologyIssues`](crate::mesh::TopologyIssues) and logged once.

use crate::primvar::PrimvarType;
use thiserror::Error;

/// Main error type for meshutil-petite operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid topology descriptor.
    #[error("Invalid topology descriptor: {0}")]
    InvalidTopology(String),

    /// Index out of bounds.
    #[error("Index {index} out of bounds (max: {max})")]
    IndexOutOfBounds { index: usize, max: usize },

    /// Invalid buffer size.
    #[error("Invalid buffer size: expected a multiple of {expected}, got {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },

    /// The primvar element type can not be interpolated, or its scalar
    /// storage does not match the type.
    #[error("Unsupported primvar type for {operation}: {primvar_type}")]
    UnsupportedPrimvarType {
        operation: &'static str,
        primvar_type: PrimvarType,
    },

    /// A raw primvar type tag that does not name any [`PrimvarType`].
    #[error("Unknown primvar type tag: {0}")]
    UnknownPrimvarType(u8),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
