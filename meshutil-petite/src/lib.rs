//#![warn(missing_docs)]
//! # Polygon Mesh Render Buffers
//!
//! This crate turns authored polygon topology (per-face vertex counts, a flat
//! vertex index buffer, hole faces and a winding order) into the buffers a
//! rasterizer consumes:
//!
//! * triangle and quad index buffers,
//! * a packed [`PrimitiveParam`](primitive_param::PrimitiveParam) per emitted
//!   primitive that names its originating face and tells wireframe shading
//!   which of its edges were introduced by the split,
//! * primvars interpolated onto the new primitives,
//! * an enumeration of authored edges with lookups in both directions.
//!
//! Everything is computed on the CPU, synchronously, from borrowed input.
//! Results are freshly allocated and returned by value.
//!
//! ## Example
//!
//! ```
//! use meshutil_petite::{
//!     mesh::{IndexOptions, MeshUtil},
//!     primitive_param::EdgeFlag,
//!     TopologyDescriptor,
//! };
//!
//! // A pentagon.
//! let topology = TopologyDescriptor::new(5, &[5], &[0, 1, 2, 3, 4]);
//! let mesh_util = MeshUtil::new(&topology, "/pentagon");
//!
//! let triangles = mesh_util.triangle_indices(IndexOptions { edge_indices: true });
//! assert_eq!(triangles.indices, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
//! assert_eq!(triangles.primitive_params[1].face_index(), 0);
//! assert_eq!(triangles.primitive_params[1].edge_flag(), EdgeFlag::Interior);
//! assert_eq!(triangles.edge_indices, Some(vec![1, 2, 3]));
//! ```
//!
//! ## Invalid Input
//!
//! Topology is never rejected by the mesh utilities. Faces with fewer than
//! three vertices and faces that run past the end of a buffer are handled
//! locally, counted in a [`TopologyIssues`](mesh::TopologyIssues) and
//! reported through one [`log`] warning per call. Use
//! [`TopologyDescriptor::validate()`] to check a topology up front.
//!
//! Handing an integer primvar to an operation that interpolates is a coding
//! error and returns an [`Error`].
//!
//! ## Features
#![doc = document_features::document_features!()]

pub mod error;
pub use error::{Error, Result};

pub mod mesh;

pub mod primitive_param;

pub mod primvar;

pub mod topology_descriptor;
pub use topology_descriptor::TopologyDescriptor;

#[cfg(feature = "tri_mesh_buffers")]
pub mod tri_mesh_buffers;

/// A vertex, edge, or face index in the topology.
///
/// # Examples
///
/// ```
/// use meshutil_petite::Index;
///
/// // Create an index from a u32
/// let idx = Index::from(42u32);
/// assert_eq!(idx.0, 42);
///
/// // Convert back to usize
/// let as_usize: usize = idx.into();
/// assert_eq!(as_usize, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Index(pub u32);

impl From<u32> for Index {
    fn from(value: u32) -> Self {
        Index(value)
    }
}

impl From<Index> for u32 {
    fn from(index: Index) -> Self {
        index.0
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index(value as u32)
    }
}

impl From<Index> for usize {
    fn from(index: Index) -> Self {
        index.0 as usize
    }
}
