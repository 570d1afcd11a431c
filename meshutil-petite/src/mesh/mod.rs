//! # Mesh Utilities
//!
//! [`MeshUtil`] turns an authored polygon topology into buffers a rasterizer
//! can draw:
//!
//! * **Triangulation** – fan splits every face
//!   ([`triangle_indices()`](MeshUtil::triangle_indices),
//!   [`triangulate_face_varying()`](MeshUtil::triangulate_face_varying)).
//! * **Quadrangulation** – passes quads through and splits every other face
//!   into quads around synthesized edge midpoints and a centroid
//!   ([`quad_info()`](MeshUtil::quad_info),
//!   [`quad_indices()`](MeshUtil::quad_indices),
//!   [`tri_quad_indices()`](MeshUtil::tri_quad_indices),
//!   [`quadrangulate_primvar()`](MeshUtil::quadrangulate_primvar),
//!   [`quadrangulate_face_varying()`](MeshUtil::quadrangulate_face_varying)).
//! * **Edge enumeration** – one vertex pair per face corner
//!   ([`enumerate_edges()`](MeshUtil::enumerate_edges)), indexed for lookups
//!   in both directions by an [`EdgeIndexTable`].
//!
//! Every emitted primitive is tagged with a
//! [`PrimitiveParam`](crate::primitive_param::PrimitiveParam).
//!
//! ## Invalid Topology
//!
//! Degenerate faces (fewer than three vertices) are skipped. Faces whose
//! vertex range runs past the end of the index buffer produce all-zero
//! primitives. Neither stops the operation. What was found is counted in the
//! [`TopologyIssues`] returned alongside every result and logged as a single
//! warning per call.
use crate::primvar::Primvar;
use crate::topology_descriptor::TopologyDescriptor;

pub mod edge_index_table;
pub use edge_index_table::*;

pub mod quadrangulate;
pub use quadrangulate::*;

pub mod triangulate;
pub use triangulate::*;

/// Options for index buffer generation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexOptions {
    /// Also emit, per primitive, the enumeration indices of the authored
    /// edges it lies on. See [`MeshUtil::enumerate_edges()`].
    pub edge_indices: bool,
}

/// Problems found in the topology during one operation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TopologyIssues {
    /// Faces with fewer than three vertices.
    pub degenerate_faces: usize,
    /// Faces whose corners run past the end of the index or value buffer.
    pub overrun_faces: usize,
    /// Values that had to be substituted with zero.
    pub missing_values: usize,
}

impl TopologyIssues {
    /// Returns `true` if nothing was wrong.
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self == TopologyIssues::default()
    }

    /// Logs one warning summarizing all issues, if there are any.
    pub(crate) fn report(&self, operation: &str, id: &str) {
        if !self.is_valid() {
            log::warn!(
                "Invalid topology found during {} [{}]: {} degenerate face(s), \
                 {} face(s) inconsistent with the index buffer, {} missing value(s).",
                operation,
                id,
                self.degenerate_faces,
                self.overrun_faces,
                self.missing_values
            );
        }
    }
}

/// A triangulated or quadrangulated primvar.
#[derive(Clone, Debug, PartialEq)]
pub struct RefinedPrimvar {
    pub primvar: Primvar,
    pub issues: TopologyIssues,
}

/// Computes render buffers for one mesh topology.
///
/// A `MeshUtil` only borrows its topology. It holds no state of its own, so
/// it is cheap to create and can be shared between threads.
///
/// ```
/// use meshutil_petite::{mesh::MeshUtil, TopologyDescriptor};
///
/// let topology = TopologyDescriptor::new(4, &[4], &[0, 1, 2, 3]);
/// let mesh_util = MeshUtil::new(&topology, "/quad");
///
/// let triangles = mesh_util.triangle_indices(Default::default());
/// assert_eq!(triangles.indices, vec![[0, 1, 2], [0, 2, 3]]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct MeshUtil<'a> {
    topology: &'a TopologyDescriptor<'a>,
    id: &'a str,
}

impl<'a> MeshUtil<'a> {
    /// Creates a mesh utility for `topology`.
    ///
    /// `id` names the mesh in log messages.
    pub fn new(topology: &'a TopologyDescriptor<'a>, id: &'a str) -> Self {
        Self { topology, id }
    }

    #[inline]
    pub fn topology(&self) -> &'a TopologyDescriptor<'a> {
        self.topology
    }

    #[inline]
    pub fn id(&self) -> &'a str {
        self.id
    }
}
