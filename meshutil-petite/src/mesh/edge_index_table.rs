//! Authored edge enumeration and lookup.
//!
//! Every face corner contributes one edge, so an edge shared by two faces is
//! enumerated twice. Enumeration indices are stable under hole toggling and
//! refinement: hole faces and degenerate faces contribute their edges too.
//!
//! ## Example
//! ```
//! use meshutil_petite::{
//!     mesh::{EdgeIndexTable, MeshUtil},
//!     Index, TopologyDescriptor,
//! };
//!
//! // Two quads sharing the edge 1-4.
//! let topology = TopologyDescriptor::new(6, &[4, 4], &[0, 1, 4, 3, 1, 2, 5, 4]);
//! let table = EdgeIndexTable::new(&MeshUtil::new(&topology, "/strip"));
//!
//! assert_eq!(table.edge_indices([4, 1]), vec![Index(1), Index(7)]);
//! assert_eq!(table.edge_vertices(Index(7)), Some([4, 1]));
//! ```
use super::{MeshUtil, TopologyIssues};
use crate::Index;
use itertools::Itertools;
use std::borrow::Cow;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The authored edges of a topology in enumeration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeEnumeration {
    /// One directed vertex pair per face corner.
    pub edge_vertices: Vec<[u32; 2]>,
    /// Enumeration index of each face's first edge. The remaining edges of a
    /// face follow sequentially.
    pub first_edge_per_face: Vec<u32>,
    pub issues: TopologyIssues,
}

/// ### Edge Enumeration
impl MeshUtil<'_> {
    /// Enumerates one edge per face corner.
    ///
    /// A face is walked in winding order: `(vj, vj+1)` for right handed
    /// topology, in reverse for left handed topology. Corners missing from the
    /// index buffer read as point `0`.
    pub fn enumerate_edges(&self) -> EdgeEnumeration {
        let topology = self.topology;
        let vertex_indices = topology.vertex_indices_per_face();
        let flip = topology.is_flipped();

        let mut edge_vertices = Vec::with_capacity(vertex_indices.len());
        let mut first_edge_per_face = Vec::with_capacity(topology.face_count());
        let mut issues = TopologyIssues::default();

        for face in topology.faces() {
            first_edge_per_face.push(face.offset as u32);

            let corners = match face.corners(vertex_indices) {
                Some(corners) => Cow::Borrowed(corners),
                None => {
                    issues.overrun_faces += 1;
                    Cow::Owned(
                        (face.offset..face.offset + face.len)
                            .map(|i| vertex_indices.get(i).copied().unwrap_or(0))
                            .collect(),
                    )
                }
            };

            let n = face.len;
            edge_vertices.extend((0..n).map(|k| {
                if flip {
                    [corners[(n - k) % n], corners[n - k - 1]]
                } else {
                    [corners[k], corners[(k + 1) % n]]
                }
            }));
        }

        issues.report("edge enumeration", self.id);

        EdgeEnumeration {
            edge_vertices,
            first_edge_per_face,
            issues,
        }
    }
}

/// Order independent key of an edge.
#[inline]
fn undirected([v0, v1]: [u32; 2]) -> [u32; 2] {
    if v1 < v0 {
        [v1, v0]
    } else {
        [v0, v1]
    }
}

/// Bidirectional lookup between authored edges and their vertex pairs.
///
/// Built once; read only afterwards.
#[derive(Clone, Debug, Default)]
pub struct EdgeIndexTable {
    edge_vertices: Vec<[u32; 2]>,
    /// Face edge ranges, one entry per face plus the total edge count.
    face_edge_offsets: Vec<u32>,
    /// Undirected key and enumeration index, sorted by key then index.
    edges_by_vertices: Vec<([u32; 2], Index)>,
}

impl EdgeIndexTable {
    /// Enumerates the edges of `mesh_util`'s topology and indexes them.
    pub fn new(mesh_util: &MeshUtil) -> Self {
        Self::from(mesh_util.enumerate_edges())
    }

    /// Returns the number of enumerated edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edge_vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edge_vertices.is_empty()
    }

    /// Returns the vertex pair of an edge, as enumerated.
    #[inline]
    pub fn edge_vertices(&self, edge: Index) -> Option<[u32; 2]> {
        self.edge_vertices.get(usize::from(edge)).copied()
    }

    /// Returns every enumeration index of the undirected edge `vertices`, in
    /// ascending order.
    ///
    /// An edge on the boundary between `k` faces has `k` indices. An edge
    /// that does not exist has none.
    pub fn edge_indices(&self, vertices: [u32; 2]) -> Vec<Index> {
        let key = undirected(vertices);
        let start = self
            .edges_by_vertices
            .partition_point(|(edge, _)| *edge < key);
        let end = start
            + self.edges_by_vertices[start..].partition_point(|(edge, _)| *edge == key);

        self.edges_by_vertices[start..end]
            .iter()
            .map(|&(_, index)| index)
            .collect()
    }

    /// Resolves several vertex pairs, dropping duplicate indices.
    pub fn edge_indices_for_pairs(&self, pairs: &[[u32; 2]]) -> Vec<Index> {
        pairs
            .iter()
            .flat_map(|&pair| self.edge_indices(pair))
            .unique()
            .collect()
    }

    /// Resolves several enumeration indices to vertex pairs.
    ///
    /// Indices out of range are skipped. An undirected edge is returned once,
    /// in the orientation first encountered.
    pub fn vertices_for_edge_indices(&self, edges: &[Index]) -> Vec<[u32; 2]> {
        edges
            .iter()
            .filter_map(|&edge| self.edge_vertices(edge))
            .unique_by(|&vertices| undirected(vertices))
            .collect()
    }

    /// Returns, for each face, the indices of every enumerated edge that
    /// shares a vertex pair with one of its edges.
    ///
    /// Neighbouring faces in `faces` yield their shared edge once each; the
    /// duplicates are kept. Faces out of range are skipped, as are edges past
    /// the end of an enumeration built by hand.
    pub fn face_edge_indices(&self, faces: &[Index]) -> Vec<Index> {
        faces
            .iter()
            .filter_map(|&face| {
                let face = usize::from(face);
                let start = *self.face_edge_offsets.get(face)? as usize;
                let end = *self.face_edge_offsets.get(face + 1)? as usize;
                Some(start..end)
            })
            .flatten()
            .filter_map(|edge| self.edge_vertices.get(edge))
            .flat_map(|&vertices| self.edge_indices(vertices))
            .collect()
    }
}

impl From<EdgeEnumeration> for EdgeIndexTable {
    fn from(enumeration: EdgeEnumeration) -> Self {
        let EdgeEnumeration {
            edge_vertices,
            mut first_edge_per_face,
            ..
        } = enumeration;

        first_edge_per_face.push(edge_vertices.len() as u32);

        let mut edges_by_vertices = edge_vertices
            .iter()
            .enumerate()
            .map(|(index, &vertices)| (undirected(vertices), Index::from(index)))
            .collect::<Vec<_>>();

        // Stable, so equal keys stay in enumeration order.
        #[cfg(feature = "rayon")]
        edges_by_vertices.par_sort_by_key(|&(key, _)| key);
        #[cfg(not(feature = "rayon"))]
        edges_by_vertices.sort_by_key(|&(key, _)| key);

        Self {
            edge_vertices,
            face_edge_offsets: first_edge_per_face,
            edges_by_vertices,
        }
    }
}
