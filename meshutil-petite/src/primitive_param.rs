//! Packed per-primitive tags.
//!
//! Every triangle or quad emitted by [`MeshUtil`](crate::mesh::MeshUtil)
//! carries one 32 bit *primitive param*. It records the authored (coarse) face
//! the primitive came from and an [`EdgeFlag`] that tells wireframe shading
//! which of the primitive's edges were introduced by triangulation or
//! quadrangulation and must be hidden.
//!
//! The layout is bit exact and shared with GPU shaders: the face index lives in
//! the upper 30 bits, the edge flag in the lower 2.
//!
//! ```
//! use meshutil_petite::primitive_param::{EdgeFlag, PrimitiveParam};
//!
//! let param = PrimitiveParam::new(7, EdgeFlag::Last);
//! assert_eq!(param.0, (7 << 2) | 2);
//! assert_eq!(param.face_index(), 7);
//! assert_eq!(param.edge_flag(), EdgeFlag::Last);
//! ```
use bytemuck::{Pod, Zeroable};
use num_enum::IntoPrimitive;

/// Number of low bits holding the edge flag.
pub const EDGE_FLAG_BITS: u32 = 2;

const EDGE_FLAG_MASK: u32 = (1 << EDGE_FLAG_BITS) - 1;

/// Packs a coarse face index and a raw edge flag.
///
/// Neither argument is rejected. The edge flag is masked to its two bits and
/// the face index to its low 30 bits; higher bits are dropped.
#[inline]
pub const fn encode_coarse_face_param(face_index: u32, edge_flag: u32) -> u32 {
    (face_index << EDGE_FLAG_BITS) | (edge_flag & EDGE_FLAG_MASK)
}

/// Returns the coarse face index stored in a packed param.
#[inline]
pub const fn decode_face_index(param: u32) -> u32 {
    param >> EDGE_FLAG_BITS
}

/// Returns the raw edge flag stored in a packed param.
#[inline]
pub const fn decode_edge_flag(param: u32) -> u32 {
    param & EDGE_FLAG_MASK
}

/// Which edges of an emitted primitive are authored.
///
/// ```text
///          0__                0  0   0__
///        _/|\ \_            _/.  ..   . \_
///      _/  | \  \_   ->   _/  .  . .   .  \_
///     /  A |C \ B \_     /  A .  .C .   . B \_
///    1-----2---3----4   1-----2  1---2   1----2
/// ```
///
/// | Sub-primitive | Flag         | Hidden edges        |
/// |---------------|--------------|---------------------|
/// | –             | `Authored`   | none                |
/// | A             | `First`      | `[2-0]`             |
/// | B             | `Last`       | `[0-1]`             |
/// | C             | `Interior`   | `[0-1]` and `[2-0]` |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, IntoPrimitive)]
#[repr(u8)]
pub enum EdgeFlag {
    /// The primitive is an authored face; show all edges.
    #[default]
    Authored = 0,
    /// First primitive of a split face.
    First = 1,
    /// Last primitive of a split face.
    Last = 2,
    /// Any primitive between the first and the last.
    Interior = 3,
}

impl EdgeFlag {
    /// Classifies sub-primitive `j` of a face split into `count` pieces.
    ///
    /// A face that is not split (`count == 1`) is [`Authored`](Self::Authored).
    #[inline]
    pub fn for_sub_primitive(j: usize, count: usize) -> Self {
        if count <= 1 {
            EdgeFlag::Authored
        } else if 0 == j {
            EdgeFlag::First
        } else if count - 1 == j {
            EdgeFlag::Last
        } else {
            EdgeFlag::Interior
        }
    }

    /// Narrows a raw value to its two low bits.
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        match bits & EDGE_FLAG_MASK {
            0 => EdgeFlag::Authored,
            1 => EdgeFlag::First,
            2 => EdgeFlag::Last,
            _ => EdgeFlag::Interior,
        }
    }
}

/// A packed primitive param.
///
/// This is `#[repr(transparent)]` over [`u32`] and [`Pod`], so a slice of
/// params can be handed to a GPU upload as-is:
///
/// ```
/// use meshutil_petite::primitive_param::{EdgeFlag, PrimitiveParam};
///
/// let params = vec![PrimitiveParam::new(0, EdgeFlag::First); 2];
/// let raw: &[u32] = bytemuck::cast_slice(&params);
/// assert_eq!(raw, &[1, 1]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct PrimitiveParam(pub u32);

impl PrimitiveParam {
    /// Packs a coarse face index and its edge flag.
    #[inline]
    pub fn new(face_index: u32, edge_flag: EdgeFlag) -> Self {
        Self(encode_coarse_face_param(face_index, u8::from(edge_flag) as u32))
    }

    /// Returns the index of the coarse face this primitive came from.
    #[inline]
    pub fn face_index(self) -> u32 {
        decode_face_index(self.0)
    }

    /// Returns the edge flag of this primitive.
    #[inline]
    pub fn edge_flag(self) -> EdgeFlag {
        EdgeFlag::from_bits(self.0)
    }
}

impl From<u32> for PrimitiveParam {
    fn from(value: u32) -> Self {
        PrimitiveParam(value)
    }
}

impl From<PrimitiveParam> for u32 {
    fn from(param: PrimitiveParam) -> Self {
        param.0
    }
}
