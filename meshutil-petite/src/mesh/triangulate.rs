//! Fan triangulation of authored faces.
//!
//! Face `[v0, v1, …, vn-1]` becomes the `n - 2` triangles
//! `(v0, vj+1, vj+2)`. With left handed topology the last two indices of each
//! triangle are swapped.
//!
//! The first and last triangle of a split face are tagged
//! [`EdgeFlag::First`] and [`EdgeFlag::Last`] so wireframe shading can hide
//! the fan edges. Flipping moves the fan edge of these two triangles to a
//! different tuple position; they are rotated by one so it ends up where the
//! flag expects it, regardless of winding.
use super::{IndexOptions, MeshUtil, RefinedPrimvar, TopologyIssues};
use crate::primitive_param::{EdgeFlag, PrimitiveParam};
use crate::primvar::{dispatch, Element, ElementOp, PrimvarRef};
use crate::topology_descriptor::{FaceKind, FaceSpan, TopologyDescriptor};
use crate::Result;
use bytemuck::Zeroable;
use slice_of_array::prelude::*;

/// A triangle index buffer with its per-triangle tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriangleIndices {
    pub indices: Vec<[u32; 3]>,
    /// One per triangle.
    pub primitive_params: Vec<PrimitiveParam>,
    /// One per triangle, if requested: the enumeration index of the authored
    /// edge the triangle lies on.
    pub edge_indices: Option<Vec<u32>>,
    pub issues: TopologyIssues,
}

impl TriangleIndices {
    /// Returns the number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the indices as one flat buffer, three per triangle.
    #[inline]
    pub fn flat_indices(&self) -> &[u32] {
        self.indices.flat()
    }
}

/// Number of triangles the renderable faces of `topology` split into.
fn triangle_count(topology: &TopologyDescriptor) -> usize {
    topology
        .faces()
        .filter(|face| FaceKind::Polygon == face.kind)
        .map(|face| face.len - 2)
        .sum()
}

/// Splits one face into a triangle fan.
///
/// `corners` is `None` if the face overruns its buffer; every triangle of the
/// face is then all zero.
fn fan_triangulate<T: Copy + Zeroable>(
    corners: Option<&[T]>,
    vertices_len: usize,
    flip: bool,
    mut emit: impl FnMut([T; 3]),
) {
    let triangles_len = vertices_len - 2;
    let Some(c) = corners else {
        (0..triangles_len).for_each(|_| emit([T::zeroed(); 3]));
        return;
    };

    for j in 0..triangles_len {
        let mut triangle = if flip {
            [c[0], c[j + 2], c[j + 1]]
        } else {
            [c[0], c[j + 1], c[j + 2]]
        };

        if flip && 3 < vertices_len {
            // 0-2-1 would hide edge 0-1 instead of 0-2, so emit 2-1-0; likewise
            // the last triangle becomes n-2, 0, n-1.
            if 0 == j {
                triangle.rotate_left(1);
            } else if triangles_len - 1 == j {
                triangle.rotate_right(1);
            }
        }

        emit(triangle);
    }
}

#[inline]
fn fan_edge_flag(j: usize, vertices_len: usize) -> EdgeFlag {
    if 3 == vertices_len {
        EdgeFlag::Authored
    } else {
        EdgeFlag::for_sub_primitive(j, vertices_len - 2)
    }
}

/// Enumeration index of the authored edge under triangle `j` of `face`.
#[inline]
fn fan_edge_index(face: &FaceSpan, j: usize, flip: bool) -> u32 {
    let first_edge = face.offset;
    let edge = if 3 == face.len {
        first_edge
    } else if flip {
        first_edge + face.len - 2 - j
    } else {
        first_edge + j + 1
    };
    edge as u32
}

/// ### Triangulation
impl MeshUtil<'_> {
    /// Returns the triangle index buffer of the topology.
    ///
    /// Hole faces and degenerate faces produce no triangles.
    pub fn triangle_indices(&self, options: IndexOptions) -> TriangleIndices {
        let topology = self.topology;
        let vertex_indices = topology.vertex_indices_per_face();
        let flip = topology.is_flipped();

        let triangles_len = triangle_count(topology);
        let mut indices = Vec::with_capacity(triangles_len);
        let mut primitive_params = Vec::with_capacity(triangles_len);
        let mut edge_indices = options
            .edge_indices
            .then(|| Vec::with_capacity(triangles_len));
        let mut issues = TopologyIssues::default();

        for face in topology.faces() {
            match face.kind {
                FaceKind::Degenerate => {
                    issues.degenerate_faces += 1;
                    continue;
                }
                FaceKind::Hole => continue,
                FaceKind::Polygon => {}
            }

            let corners = face.corners(vertex_indices);
            if corners.is_none() {
                issues.overrun_faces += 1;
            }
            fan_triangulate(corners, face.len, flip, |triangle| indices.push(triangle));

            for j in 0..face.len - 2 {
                primitive_params.push(PrimitiveParam::new(face.index, fan_edge_flag(j, face.len)));
                if let Some(edge_indices) = edge_indices.as_mut() {
                    edge_indices.push(fan_edge_index(&face, j, flip));
                }
            }
        }

        issues.report("triangulation", self.id);
        log::trace!("Triangulated [{}] into {} triangles.", self.id, indices.len());

        TriangleIndices {
            indices,
            primitive_params,
            edge_indices,
            issues,
        }
    }

    /// Triangulates a face-varying primvar the same way
    /// [`triangle_indices()`](Self::triangle_indices) triangulates the
    /// topology.
    ///
    /// `source` holds one value per face corner. The result holds three values
    /// per triangle. Corners missing from `source` turn the whole face into
    /// zeros.
    ///
    /// # Errors
    ///
    /// Integer primvar types and malformed buffers are rejected.
    pub fn triangulate_face_varying(&self, source: PrimvarRef<'_>) -> Result<RefinedPrimvar> {
        const OPERATION: &str = "face-varying triangulation";

        let mut op = FaceVaryingTriangulation {
            topology: self.topology,
            issues: TopologyIssues::default(),
        };
        let primvar = dispatch(&mut op, OPERATION, self.id, source)?;
        op.issues.report(OPERATION, self.id);

        Ok(RefinedPrimvar {
            primvar,
            issues: op.issues,
        })
    }
}

struct FaceVaryingTriangulation<'a> {
    topology: &'a TopologyDescriptor<'a>,
    issues: TopologyIssues,
}

impl ElementOp for FaceVaryingTriangulation<'_> {
    fn apply<E: Element>(&mut self, source: &[E]) -> Vec<E> {
        let flip = self.topology.is_flipped();
        let mut values = Vec::with_capacity(3 * triangle_count(self.topology));

        for face in self.topology.faces() {
            match face.kind {
                FaceKind::Degenerate => {
                    self.issues.degenerate_faces += 1;
                    continue;
                }
                FaceKind::Hole => continue,
                FaceKind::Polygon => {}
            }

            let corners = face.corners(source);
            if corners.is_none() {
                self.issues.overrun_faces += 1;
            }
            fan_triangulate(corners, face.len, flip, |triangle| {
                values.extend_from_slice(&triangle)
            });
        }

        values
    }
}
