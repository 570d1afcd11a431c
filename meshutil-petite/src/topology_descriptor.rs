//! A container holding references to raw topology data.
//!
//! ## Example
//! ```
//! # use meshutil_petite::TopologyDescriptor;
//! // A strip of three quads; the middle one is a hole.
//! let mut strip = TopologyDescriptor::new(
//!     8,
//!     &[4, 4, 4],
//!     &[0, 1, 5, 4, 1, 2, 6, 5, 2, 3, 7, 6],
//! );
//! strip.holes(&[1]);
//!
//! assert_eq!(strip.face_count(), 3);
//! assert_eq!(strip.effective_holes(), &[1]);
//! ```
//!
//! ## Holes
//!
//! A hole face keeps its slot in the face arrays, so indices of later faces do
//! not shift, but it produces no triangles or quads. Hole indices must be
//! strictly ascending; [`HoleFaces`] enforces this when the descriptor is
//! built.
//!
//! Once a topology has been refined its holes are part of the refined
//! surface already. A descriptor with a [`refinement_level()`] above zero
//! therefore reports no [`effective_holes()`].
//!
//! [`refinement_level()`]: TopologyDescriptor::refinement_level
//! [`effective_holes()`]: TopologyDescriptor::effective_holes
use crate::{Error, Result};
use itertools::Itertools;
use std::borrow::Cow;

/// Vertex winding of the authored faces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Counter-clockwise front faces. Nothing is flipped.
    #[default]
    RightHanded,
    /// Clockwise front faces. Index order is flipped on output.
    LeftHanded,
}

/// Face indices tagged as holes, guaranteed strictly ascending.
///
/// An ascending slice is borrowed as is. Anything else is sorted and
/// deduplicated into an owned copy.
///
/// ```
/// # use meshutil_petite::topology_descriptor::HoleFaces;
/// assert_eq!(HoleFaces::new(&[4, 1, 4]).as_slice(), &[1, 4]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoleFaces<'a>(Cow<'a, [u32]>);

impl<'a> HoleFaces<'a> {
    pub fn new(holes: &'a [u32]) -> Self {
        if holes.iter().tuple_windows().all(|(a, b)| a < b) {
            HoleFaces(Cow::Borrowed(holes))
        } else {
            log::warn!(
                "Hole face indices are not strictly ascending; sorting {} entries.",
                holes.len()
            );
            let mut sorted = holes.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            HoleFaces(Cow::Owned(sorted))
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// A `TopologyDescriptor` holds references to raw topology data as flat index
/// buffers.
///
/// This is the read-only input of a [`MeshUtil`](crate::mesh::MeshUtil) and
/// an [`EdgeIndexTable`](crate::mesh::EdgeIndexTable).
///
/// See the [module level documentation](crate::topology_descriptor) for
/// an example.
#[derive(Clone, Debug)]
pub struct TopologyDescriptor<'a> {
    points_len: usize,
    vertices_per_face: &'a [u32],
    vertex_indices_per_face: &'a [u32],
    holes: HoleFaces<'a>,
    orientation: Orientation,
    refinement_level: u32,
}

impl<'a> TopologyDescriptor<'a> {
    /// Describes a mesh topology.
    ///
    /// Nothing is validated here; the mesh utilities cope with inconsistent
    /// data face by face. Call [`validate()`](Self::validate) to check the
    /// descriptor up front.
    ///
    /// # Arguments
    ///
    /// * `points_len` - The number of points in the mesh.
    /// * `vertices_per_face` - A slice containing the number of vertices for
    ///   each face in the mesh. The length of this is the number of faces in
    ///   the mesh.
    /// * `vertex_indices_per_face` - A flat list of the vertex indices for each
    ///   face in the mesh.
    #[inline]
    pub fn new(
        points_len: usize,
        vertices_per_face: &'a [u32],
        vertex_indices_per_face: &'a [u32],
    ) -> TopologyDescriptor<'a> {
        TopologyDescriptor {
            points_len,
            vertices_per_face,
            vertex_indices_per_face,
            holes: HoleFaces::default(),
            orientation: Orientation::RightHanded,
            refinement_level: 0,
        }
    }

    /// Add holes as face indices.
    #[inline]
    pub fn holes(&mut self, holes: &'a [u32]) -> &mut Self {
        self.holes = HoleFaces::new(holes);
        self
    }

    /// Set if the topology describes faces with left handed (clockwise)
    /// winding.
    #[inline]
    pub fn left_handed(&mut self, left_handed: bool) -> &mut Self {
        self.orientation = if left_handed {
            Orientation::LeftHanded
        } else {
            Orientation::RightHanded
        };
        self
    }

    /// Set the refinement level this topology was produced at.
    #[inline]
    pub fn refine_level(&mut self, refinement_level: u32) -> &mut Self {
        self.refinement_level = refinement_level;
        self
    }

    /// Returns the number of points.
    #[inline]
    pub fn points_len(&self) -> usize {
        self.points_len
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertices_per_face.len()
    }

    #[inline]
    pub fn vertices_per_face(&self) -> &'a [u32] {
        self.vertices_per_face
    }

    #[inline]
    pub fn vertex_indices_per_face(&self) -> &'a [u32] {
        self.vertex_indices_per_face
    }

    /// Returns the hole faces as authored (sorted).
    #[inline]
    pub fn hole_faces(&self) -> &[u32] {
        self.holes.as_slice()
    }

    /// Returns the holes the mesh utilities skip: the authored holes at the
    /// base level, none once the topology is refined.
    #[inline]
    pub fn effective_holes(&self) -> &[u32] {
        if 0 < self.refinement_level {
            &[]
        } else {
            self.holes.as_slice()
        }
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn refinement_level(&self) -> u32 {
        self.refinement_level
    }

    /// Returns `true` if output index order must be flipped.
    #[inline]
    pub fn is_flipped(&self) -> bool {
        Orientation::RightHanded != self.orientation
    }

    /// Checks the descriptor for consistency.
    ///
    /// This is the strict counterpart of the lenient per-face handling in
    /// [`MeshUtil`](crate::mesh::MeshUtil).
    pub fn validate(&self) -> Result<()> {
        let corners = self
            .vertices_per_face
            .iter()
            .map(|&count| count as usize)
            .sum::<usize>();
        if self.vertex_indices_per_face.len() != corners {
            return Err(Error::InvalidTopology(format!(
                "The number of vertex indices ({}) is not equal to the sum of face arities ({}).",
                self.vertex_indices_per_face.len(),
                corners
            )));
        }

        if let Some((i, &count)) = self
            .vertices_per_face
            .iter()
            .find_position(|&&count| count < 3)
        {
            return Err(Error::InvalidTopology(format!(
                "Face {} has {} vertices (should be at least 3).",
                i, count
            )));
        }

        if let Some(&vertex_index) = self
            .vertex_indices_per_face
            .iter()
            .find(|&&vertex_index| self.points_len <= vertex_index as usize)
        {
            return Err(Error::IndexOutOfBounds {
                index: vertex_index as usize,
                max: self.points_len,
            });
        }

        if let Some(&hole) = self
            .holes
            .as_slice()
            .iter()
            .find(|&&hole| self.face_count() <= hole as usize)
        {
            return Err(Error::IndexOutOfBounds {
                index: hole as usize,
                max: self.face_count(),
            });
        }

        Ok(())
    }

    /// Walks all faces with the holes the mesh utilities honor.
    #[inline]
    pub(crate) fn faces(&self) -> FaceCursor<'_> {
        FaceCursor::new(self.vertices_per_face, self.effective_holes())
    }
}

/// How a face takes part in triangulation and quadrangulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FaceKind {
    /// Fewer than three vertices.
    Degenerate,
    /// Tagged as a hole.
    Hole,
    /// Renderable.
    Polygon,
}

/// One face as seen by a [`FaceCursor`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FaceSpan {
    pub index: u32,
    /// Offset of the face's first corner in the flattened corner arrays.
    pub offset: usize,
    pub len: usize,
    pub kind: FaceKind,
}

impl FaceSpan {
    /// Returns this face's corners of `values`, or `None` if they run past its
    /// end.
    #[inline]
    pub fn corners<'v, T>(&self, values: &'v [T]) -> Option<&'v [T]> {
        values.get(self.offset..self.offset + self.len)
    }
}

/// Iterates faces in order, tracking the corner offset and the hole list in
/// lockstep.
///
/// Every face, renderable or not, advances the corner offset by its vertex
/// count. Hole entries that fall behind the current face (e.g. a hole that is
/// also degenerate) are stepped over.
#[derive(Clone, Debug)]
pub(crate) struct FaceCursor<'a> {
    vertices_per_face: std::slice::Iter<'a, u32>,
    holes: &'a [u32],
    face: u32,
    offset: usize,
}

impl<'a> FaceCursor<'a> {
    pub fn new(vertices_per_face: &'a [u32], holes: &'a [u32]) -> Self {
        Self {
            vertices_per_face: vertices_per_face.iter(),
            holes,
            face: 0,
            offset: 0,
        }
    }

    fn take_hole(&mut self, face: u32) -> bool {
        while let Some((&hole, rest)) = self.holes.split_first() {
            if face < hole {
                return false;
            }
            self.holes = rest;
            if face == hole {
                return true;
            }
        }
        false
    }
}

impl Iterator for FaceCursor<'_> {
    type Item = FaceSpan;

    fn next(&mut self) -> Option<FaceSpan> {
        let len = *self.vertices_per_face.next()? as usize;
        let index = self.face;
        let offset = self.offset;
        self.face += 1;
        self.offset += len;

        let kind = if len < 3 {
            FaceKind::Degenerate
        } else if self.take_hole(index) {
            FaceKind::Hole
        } else {
            FaceKind::Polygon
        };

        Some(FaceSpan {
            index,
            offset,
            len,
            kind,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.vertices_per_face.size_hint()
    }
}

impl ExactSizeIterator for FaceCursor<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(vertices_per_face: &[u32], holes: &[u32]) -> Vec<(u32, usize, FaceKind)> {
        FaceCursor::new(vertices_per_face, holes)
            .map(|face| (face.index, face.offset, face.kind))
            .collect()
    }

    #[test]
    fn test_cursor_offsets() {
        assert_eq!(
            kinds(&[4, 3, 5], &[]),
            vec![
                (0, 0, FaceKind::Polygon),
                (1, 4, FaceKind::Polygon),
                (2, 7, FaceKind::Polygon)
            ]
        );
        assert_eq!(FaceCursor::new(&[4, 3, 5], &[]).len(), 3);
    }

    #[test]
    fn test_cursor_holes() {
        assert_eq!(
            kinds(&[4, 4, 4], &[1]),
            vec![
                (0, 0, FaceKind::Polygon),
                (1, 4, FaceKind::Hole),
                (2, 8, FaceKind::Polygon)
            ]
        );
    }

    #[test]
    fn test_cursor_degenerate_hole() {
        // Hole 1 is degenerate; it must not keep hole 2 from being found.
        assert_eq!(
            kinds(&[3, 2, 3, 3], &[1, 2]),
            vec![
                (0, 0, FaceKind::Polygon),
                (1, 3, FaceKind::Degenerate),
                (2, 5, FaceKind::Hole),
                (3, 8, FaceKind::Polygon)
            ]
        );
    }

    #[test]
    fn test_cursor_ignores_out_of_range_holes() {
        assert_eq!(kinds(&[3], &[4]), vec![(0, 0, FaceKind::Polygon)]);
    }

    #[test]
    fn test_face_span_corners() {
        let span = FaceSpan {
            index: 1,
            offset: 3,
            len: 3,
            kind: FaceKind::Polygon,
        };
        assert_eq!(span.corners(&[0, 1, 2, 3, 4, 5]), Some(&[3, 4, 5][..]));
        assert_eq!(span.corners(&[0, 1, 2, 3, 4]), None);
    }
}
