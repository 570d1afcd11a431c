//! Quadrangulation of authored faces.
//!
//! Quads pass through unchanged. Every other face with `n` vertices is split
//! into `n` quads that share a synthesized centroid `C` and use synthesized
//! edge midpoints `E0 … En-1`, where `Ej` sits on the edge from `vj` to
//! `vj+1`:
//!
//! ```text
//!            v2
//!           /  \
//!         E2    E1
//!         / \  / \
//!        /   C    \       quad j = (vj, Ej, C, Ej-1)
//!       /    |     \
//!     v0 --- E0 --- v1
//! ```
//!
//! Synthesized points are appended after the original points. Each non-quad
//! face, in face order, adds its `n` midpoints followed by its centroid.
//! [`QuadInfo`] records what is needed to compute their primvar values.
//!
//! ```
//! use meshutil_petite::{mesh::MeshUtil, TopologyDescriptor};
//!
//! let topology = TopologyDescriptor::new(3, &[3], &[0, 1, 2]);
//! let mesh_util = MeshUtil::new(&topology, "/triangle");
//!
//! let quad_info = mesh_util.quad_info();
//! assert_eq!(quad_info.additional_points_len, 4);
//!
//! // Points 3, 4, 5 are the edge midpoints, 6 is the centroid.
//! let quads = mesh_util.quad_indices(Default::default());
//! assert_eq!(quads.indices, vec![[0, 3, 6, 5], [1, 4, 6, 3], [2, 5, 6, 4]]);
//! ```
use super::{IndexOptions, MeshUtil, RefinedPrimvar, TopologyIssues};
use crate::primitive_param::{EdgeFlag, PrimitiveParam};
use crate::primvar::{dispatch, Element, ElementOp, PrimvarRef};
use crate::topology_descriptor::{FaceKind, FaceSpan, TopologyDescriptor};
use crate::Result;
use bytemuck::Pod;

/// Layout of the points synthesized by quadrangulation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadInfo {
    /// Index of the first synthesized point; the original point count.
    pub points_offset: usize,
    /// Number of synthesized points: one more than the vertex count of each
    /// non-quad face.
    pub additional_points_len: usize,
    pub max_vertices_per_non_quad_face: usize,
    /// Vertex count of each non-quad face.
    pub vertices_per_non_quad_face: Vec<u32>,
    /// Flattened vertex indices of the non-quad faces.
    pub non_quad_vertex_indices: Vec<u32>,
    pub issues: TopologyIssues,
}

impl QuadInfo {
    /// Returns `true` if every renderable face is already a quad.
    #[inline]
    pub fn is_all_quads(&self) -> bool {
        self.vertices_per_non_quad_face.is_empty()
    }

    /// Number of points after quadrangulation.
    #[inline]
    pub fn points_len(&self) -> usize {
        self.points_offset + self.additional_points_len
    }
}

/// Output arity of quad emission.
///
/// Quad indices are computed once and handed to [`emit()`](Self::emit), which
/// decides how they land in the index buffer.
pub trait QuadEmitter: Pod {
    const INDICES_PER_QUAD: usize;

    fn emit(quad: [u32; 4]) -> Self;
}

/// Four indices per quad.
pub type Quad = [u32; 4];

/// Six indices per quad: the triangles 0-1-2 and 2-3-0.
pub type TriQuad = [u32; 6];

impl QuadEmitter for Quad {
    const INDICES_PER_QUAD: usize = 4;

    #[inline]
    fn emit(quad: [u32; 4]) -> Self {
        quad
    }
}

impl QuadEmitter for TriQuad {
    const INDICES_PER_QUAD: usize = 6;

    #[inline]
    fn emit(quad: [u32; 4]) -> Self {
        [quad[0], quad[1], quad[2], quad[2], quad[3], quad[0]]
    }
}

/// A quad index buffer with its per-quad tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadIndices<Q> {
    pub indices: Vec<Q>,
    /// One per quad.
    pub primitive_params: Vec<PrimitiveParam>,
    /// One pair per quad, if requested: the enumeration indices of the
    /// authored edges under the quad's `0-1` and `3-0` sides.
    pub edge_indices: Option<Vec<[u32; 2]>>,
    pub issues: TopologyIssues,
}

impl<Q: QuadEmitter> QuadIndices<Q> {
    /// Returns the number of quads.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the indices as one flat buffer.
    #[inline]
    pub fn flat_indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Number of quads the renderable faces of `topology` split into.
fn quad_count(topology: &TopologyDescriptor) -> usize {
    topology
        .faces()
        .filter(|face| FaceKind::Polygon == face.kind)
        .map(|face| if 4 == face.len { 1 } else { face.len })
        .sum()
}

/// Enumeration index of the authored edge from corner `corner` to the next
/// one, see [`MeshUtil::enumerate_edges()`].
#[inline]
fn authored_edge_index(face: &FaceSpan, corner: usize, flip: bool) -> u32 {
    let k = if flip {
        face.len - 1 - corner
    } else {
        corner
    };
    (face.offset + k) as u32
}

/// Authored edges under the `0-1` and `3-0` sides of the quad at corner `j`.
#[inline]
fn quad_edge_indices(face: &FaceSpan, j: usize, flip: bool) -> [u32; 2] {
    let prev = (j + face.len - 1) % face.len;
    let (side_01, side_30) = if flip { (prev, j) } else { (j, prev) };
    [
        authored_edge_index(face, side_01, flip),
        authored_edge_index(face, side_30, flip),
    ]
}

/// ### Quadrangulation
impl MeshUtil<'_> {
    /// Computes the layout of the points quadrangulation synthesizes.
    pub fn quad_info(&self) -> QuadInfo {
        let topology = self.topology;
        let vertex_indices = topology.vertex_indices_per_face();

        let mut quad_info = QuadInfo {
            points_offset: topology.points_len(),
            ..Default::default()
        };

        for face in topology.faces() {
            match face.kind {
                FaceKind::Degenerate => {
                    quad_info.issues.degenerate_faces += 1;
                    continue;
                }
                FaceKind::Hole => continue,
                FaceKind::Polygon if 4 == face.len => continue,
                FaceKind::Polygon => {}
            }

            quad_info.vertices_per_non_quad_face.push(face.len as u32);
            match face.corners(vertex_indices) {
                Some(corners) => quad_info.non_quad_vertex_indices.extend_from_slice(corners),
                None => {
                    quad_info.issues.overrun_faces += 1;
                    quad_info.non_quad_vertex_indices.extend(
                        (face.offset..face.offset + face.len)
                            .map(|i| vertex_indices.get(i).copied().unwrap_or(0)),
                    );
                }
            }

            quad_info.additional_points_len += face.len + 1;
            quad_info.max_vertices_per_non_quad_face =
                quad_info.max_vertices_per_non_quad_face.max(face.len);
        }

        quad_info.issues.report("quadrangulation setup", self.id);

        quad_info
    }

    /// Returns the quad index buffer, four indices per quad.
    pub fn quad_indices(&self, options: IndexOptions) -> QuadIndices<Quad> {
        self.compute_quad_indices(options)
    }

    /// Returns the quad index buffer with each quad split into two triangles,
    /// six indices per quad.
    pub fn tri_quad_indices(&self, options: IndexOptions) -> QuadIndices<TriQuad> {
        self.compute_quad_indices(options)
    }

    fn compute_quad_indices<Q: QuadEmitter>(&self, options: IndexOptions) -> QuadIndices<Q> {
        let topology = self.topology;
        let vertex_indices = topology.vertex_indices_per_face();
        let flip = topology.is_flipped();

        let quads_len = quad_count(topology);
        let mut indices = Vec::with_capacity(quads_len);
        let mut primitive_params = Vec::with_capacity(quads_len);
        let mut edge_indices = options.edge_indices.then(|| Vec::with_capacity(quads_len));
        let mut issues = TopologyIssues::default();

        // Index of the first synthesized point of the current non-quad face.
        let mut synthesized = topology.points_len() as u32;

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

            if 4 == face.len {
                let quad = match corners {
                    Some(c) if flip => [c[0], c[3], c[2], c[1]],
                    Some(c) => [c[0], c[1], c[2], c[3]],
                    None => [0; 4],
                };
                indices.push(Q::emit(quad));
                primitive_params.push(PrimitiveParam::new(face.index, EdgeFlag::Authored));
                if let Some(edge_indices) = edge_indices.as_mut() {
                    edge_indices.push(quad_edge_indices(&face, 0, flip));
                }
                continue;
            }

            let vertices_len = face.len as u32;
            let center = synthesized + vertices_len;
            for j in 0..face.len {
                let edge_next = synthesized + j as u32;
                let edge_prev = synthesized + (j as u32 + vertices_len - 1) % vertices_len;
                let quad = match corners {
                    Some(c) if flip => [c[j], edge_prev, center, edge_next],
                    Some(c) => [c[j], edge_next, center, edge_prev],
                    None => [0; 4],
                };
                indices.push(Q::emit(quad));
                primitive_params.push(PrimitiveParam::new(
                    face.index,
                    EdgeFlag::for_sub_primitive(j, face.len),
                ));
                if let Some(edge_indices) = edge_indices.as_mut() {
                    edge_indices.push(quad_edge_indices(&face, j, flip));
                }
            }
            synthesized += vertices_len + 1;
        }

        issues.report("quadrangulation", self.id);
        log::trace!("Quadrangulated [{}] into {} quads.", self.id, indices.len());

        QuadIndices {
            indices,
            primitive_params,
            edge_indices,
            issues,
        }
    }

    /// Extends a vertex-rate primvar with values for the synthesized points.
    ///
    /// The result holds [`QuadInfo::points_len()`] values: the first
    /// `points_offset` copied from `source`, then each edge midpoint as the
    /// mean of its two end points and each centroid as the mean of its face's
    /// corners. If `source` is shorter than `points_offset` the missing values
    /// are zero.
    ///
    /// # Errors
    ///
    /// Integer primvar types and malformed buffers are rejected.
    pub fn quadrangulate_primvar(
        &self,
        quad_info: &QuadInfo,
        source: PrimvarRef<'_>,
    ) -> Result<RefinedPrimvar> {
        const OPERATION: &str = "primvar quadrangulation";

        let mut op = VertexQuadrangulation {
            quad_info,
            issues: TopologyIssues::default(),
        };
        let primvar = dispatch(&mut op, OPERATION, self.id, source)?;
        op.issues.report(OPERATION, self.id);

        Ok(RefinedPrimvar {
            primvar,
            issues: op.issues,
        })
    }

    /// Quadrangulates a face-varying primvar the same way
    /// [`quad_indices()`](Self::quad_indices) quadrangulates the topology.
    ///
    /// `source` holds one value per face corner. The result holds four values
    /// per quad. Corners missing from `source` turn the whole face into zeros.
    ///
    /// # Errors
    ///
    /// Integer primvar types and malformed buffers are rejected.
    pub fn quadrangulate_face_varying(&self, source: PrimvarRef<'_>) -> Result<RefinedPrimvar> {
        const OPERATION: &str = "face-varying quadrangulation";

        let mut op = FaceVaryingQuadrangulation {
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

struct VertexQuadrangulation<'a> {
    quad_info: &'a QuadInfo,
    issues: TopologyIssues,
}

impl VertexQuadrangulation<'_> {
    /// Value of original point `index`; zero if there is none.
    fn point<E: Element>(&mut self, results: &[E], index: u32) -> E {
        match results[..self.quad_info.points_offset].get(index as usize) {
            Some(&value) => value,
            None => {
                self.issues.missing_values += 1;
                E::zeroed()
            }
        }
    }
}

impl ElementOp for VertexQuadrangulation<'_> {
    fn apply<E: Element>(&mut self, source: &[E]) -> Vec<E> {
        let quad_info = self.quad_info;
        let points_offset = quad_info.points_offset;

        let mut results = Vec::with_capacity(quad_info.points_len());
        let copied = source.len().min(points_offset);
        results.extend_from_slice(&source[..copied]);
        if copied < points_offset {
            self.issues.missing_values += points_offset - copied;
            results.resize(points_offset, E::zeroed());
        }

        let mut offset = 0;
        for &vertices_len in &quad_info.vertices_per_non_quad_face {
            let vertices_len = vertices_len as usize;
            let Some(face) = quad_info
                .non_quad_vertex_indices
                .get(offset..offset + vertices_len)
            else {
                self.issues.overrun_faces += 1;
                break;
            };

            let mut center = E::zeroed();
            for j in 0..vertices_len {
                let p0 = self.point(&results, face[j]);
                let p1 = self.point(&results, face[(j + 1) % vertices_len]);
                results.push(p0.midpoint(p1));
                center = center.add(p0);
            }
            results.push(center.div(vertices_len));

            offset += vertices_len;
        }

        // An inconsistent quad info can stop short; keep the promised length.
        results.resize(quad_info.points_len(), E::zeroed());
        results
    }
}

struct FaceVaryingQuadrangulation<'a> {
    topology: &'a TopologyDescriptor<'a>,
    issues: TopologyIssues,
}

impl ElementOp for FaceVaryingQuadrangulation<'_> {
    fn apply<E: Element>(&mut self, source: &[E]) -> Vec<E> {
        let flip = self.topology.is_flipped();
        let mut values = Vec::with_capacity(4 * quad_count(self.topology));

        for face in self.topology.faces() {
            match face.kind {
                FaceKind::Degenerate => {
                    self.issues.degenerate_faces += 1;
                    continue;
                }
                FaceKind::Hole => continue,
                FaceKind::Polygon => {}
            }

            let n = face.len;
            let Some(c) = face.corners(source) else {
                self.issues.overrun_faces += 1;
                let quads_len = if 4 == n { 1 } else { n };
                values.resize(values.len() + 4 * quads_len, E::zeroed());
                continue;
            };

            if 4 == n {
                if flip {
                    values.extend_from_slice(&[c[0], c[3], c[2], c[1]]);
                } else {
                    values.extend_from_slice(c);
                }
                continue;
            }

            let center = c.iter().fold(E::zeroed(), |sum, &value| sum.add(value)).div(n);
            for j in 0..n {
                let edge_next = c[j].midpoint(c[(j + 1) % n]);
                let edge_prev = c[j].midpoint(c[(j + n - 1) % n]);
                if flip {
                    values.extend_from_slice(&[c[j], edge_prev, center, edge_next]);
                } else {
                    values.extend_from_slice(&[c[j], edge_next, center, edge_prev]);
                }
            }
        }

        values
    }
}
