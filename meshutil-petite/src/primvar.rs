//! Primvar buffers and the numeric element abstraction.
//!
//! Primvars reach the mesh utilities as flat scalar buffers plus a
//! [`PrimvarType`] tag that says how many scalars make up one element. The tag
//! is matched once per call and the actual work runs on `[S; N]` elements
//! through the [`Element`] trait, so the eight interpolatable shapes
//! (`f32`/`f64` × 1–4 components) share one implementation.
//!
//! ```
//! use meshutil_petite::primvar::{PrimvarRef, PrimvarType};
//!
//! let uvs = [0.0f32, 0.0, 1.0, 0.0, 1.0, 1.0];
//! let primvar = PrimvarRef::new(PrimvarType::FloatVec2, &uvs[..]);
//! assert_eq!(primvar.len(), 3);
//! ```
use crate::{Error, Result};
use bytemuck::{Pod, Zeroable};
use derive_more::{Display, From};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use slice_of_array::prelude::*;
use std::fmt::Debug;
use std::ops::{Add, Div};

/// Element type of a primvar.
///
/// Only the floating point types can be interpolated. The integer types exist
/// so callers can describe every buffer they hold; handing one to an
/// interpolating operation is a coding error.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Display, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum PrimvarType {
    Float = 0,
    FloatVec2 = 1,
    FloatVec3 = 2,
    FloatVec4 = 3,
    Double = 4,
    DoubleVec2 = 5,
    DoubleVec3 = 6,
    DoubleVec4 = 7,
    Int = 8,
    IntVec2 = 9,
    IntVec3 = 10,
    IntVec4 = 11,
}

impl PrimvarType {
    /// Looks up a type from its raw tag.
    pub fn from_tag(tag: u8) -> Result<Self> {
        Self::try_from(tag).map_err(|_| Error::UnknownPrimvarType(tag))
    }

    /// Number of scalar components per element.
    pub fn arity(self) -> usize {
        use PrimvarType::*;
        match self {
            Float | Double | Int => 1,
            FloatVec2 | DoubleVec2 | IntVec2 => 2,
            FloatVec3 | DoubleVec3 | IntVec3 => 3,
            FloatVec4 | DoubleVec4 | IntVec4 => 4,
        }
    }

    /// Returns `true` if elements of this type can be averaged.
    pub fn is_interpolatable(self) -> bool {
        !matches!(
            self,
            PrimvarType::Int | PrimvarType::IntVec2 | PrimvarType::IntVec3 | PrimvarType::IntVec4
        )
    }
}

/// Borrowed flat scalar storage.
#[derive(Copy, Clone, Debug, PartialEq, From)]
pub enum PrimvarSlice<'a> {
    Float(&'a [f32]),
    Double(&'a [f64]),
    Int(&'a [i32]),
}

/// Owned flat scalar storage.
#[derive(Clone, Debug, PartialEq, From)]
pub enum PrimvarData {
    Float(Vec<f32>),
    Double(Vec<f64>),
    Int(Vec<i32>),
}

impl PrimvarData {
    fn scalar_len(&self) -> usize {
        match self {
            PrimvarData::Float(values) => values.len(),
            PrimvarData::Double(values) => values.len(),
            PrimvarData::Int(values) => values.len(),
        }
    }
}

/// A borrowed primvar: flat scalars plus their element type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PrimvarRef<'a> {
    pub primvar_type: PrimvarType,
    pub values: PrimvarSlice<'a>,
}

impl<'a> PrimvarRef<'a> {
    pub fn new(primvar_type: PrimvarType, values: impl Into<PrimvarSlice<'a>>) -> Self {
        Self {
            primvar_type,
            values: values.into(),
        }
    }

    /// Number of elements (not scalars).
    pub fn len(&self) -> usize {
        let scalars = match self.values {
            PrimvarSlice::Float(values) => values.len(),
            PrimvarSlice::Double(values) => values.len(),
            PrimvarSlice::Int(values) => values.len(),
        };
        scalars / self.primvar_type.arity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        0 == self.len()
    }
}

/// An owned primvar, as produced by triangulation and quadrangulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Primvar {
    pub primvar_type: PrimvarType,
    pub values: PrimvarData,
}

impl Primvar {
    /// Number of elements (not scalars).
    pub fn len(&self) -> usize {
        self.values.scalar_len() / self.primvar_type.arity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        0 == self.len()
    }

    pub fn as_primvar_ref(&self) -> PrimvarRef<'_> {
        PrimvarRef {
            primvar_type: self.primvar_type,
            values: match &self.values {
                PrimvarData::Float(values) => PrimvarSlice::Float(values),
                PrimvarData::Double(values) => PrimvarSlice::Double(values),
                PrimvarData::Int(values) => PrimvarSlice::Int(values),
            },
        }
    }

    /// The flat scalars if this is a single precision primvar.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.values {
            PrimvarData::Float(values) => Some(values),
            _ => None,
        }
    }

    /// The flat scalars if this is a double precision primvar.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.values {
            PrimvarData::Double(values) => Some(values),
            _ => None,
        }
    }
}

/// A floating point scalar an [`Element`] is made of.
pub trait Scalar: Pod + Debug + PartialEq + Add<Output = Self> + Div<Output = Self> {
    fn from_count(count: usize) -> Self;
}

impl Scalar for f32 {
    #[inline]
    fn from_count(count: usize) -> Self {
        count as f32
    }
}

impl Scalar for f64 {
    #[inline]
    fn from_count(count: usize) -> Self {
        count as f64
    }
}

/// A fixed-arity numeric tuple that supports elementwise addition and
/// division by a count.
pub trait Element: Copy + Zeroable + Debug + PartialEq {
    fn add(self, other: Self) -> Self;

    fn div(self, count: usize) -> Self;

    /// Elementwise arithmetic mean of two elements.
    #[inline]
    fn midpoint(self, other: Self) -> Self {
        self.add(other).div(2)
    }
}

impl<S: Scalar, const N: usize> Element for [S; N]
where
    [S; N]: Pod,
{
    #[inline]
    fn add(mut self, other: Self) -> Self {
        for (a, b) in self.iter_mut().zip(other) {
            *a = *a + b;
        }
        self
    }

    #[inline]
    fn div(mut self, count: usize) -> Self {
        let divisor = S::from_count(count);
        for a in self.iter_mut() {
            *a = *a / divisor;
        }
        self
    }
}

/// An operation that can run on any [`Element`] type.
pub(crate) trait ElementOp {
    fn apply<E: Element>(&mut self, source: &[E]) -> Vec<E>;
}

/// Matches the type tag once and runs `op` on the typed elements.
pub(crate) fn dispatch<O: ElementOp>(
    op: &mut O,
    operation: &'static str,
    id: &str,
    source: PrimvarRef<'_>,
) -> Result<Primvar> {
    use PrimvarType::*;

    let primvar_type = source.primvar_type;
    let values = match (primvar_type, source.values) {
        (Float, PrimvarSlice::Float(v)) => run::<_, 1, _>(op, v).map(PrimvarData::Float),
        (FloatVec2, PrimvarSlice::Float(v)) => run::<_, 2, _>(op, v).map(PrimvarData::Float),
        (FloatVec3, PrimvarSlice::Float(v)) => run::<_, 3, _>(op, v).map(PrimvarData::Float),
        (FloatVec4, PrimvarSlice::Float(v)) => run::<_, 4, _>(op, v).map(PrimvarData::Float),
        (Double, PrimvarSlice::Double(v)) => run::<_, 1, _>(op, v).map(PrimvarData::Double),
        (DoubleVec2, PrimvarSlice::Double(v)) => run::<_, 2, _>(op, v).map(PrimvarData::Double),
        (DoubleVec3, PrimvarSlice::Double(v)) => run::<_, 3, _>(op, v).map(PrimvarData::Double),
        (DoubleVec4, PrimvarSlice::Double(v)) => run::<_, 4, _>(op, v).map(PrimvarData::Double),
        _ => Err(Error::UnsupportedPrimvarType {
            operation,
            primvar_type,
        }),
    };

    match values {
        Ok(values) => Ok(Primvar {
            primvar_type,
            values,
        }),
        Err(error) => {
            log::error!("{error} [{id}]");
            Err(error)
        }
    }
}

fn run<S, const N: usize, O>(op: &mut O, flat: &[S]) -> Result<Vec<S>>
where
    S: Scalar,
    [S; N]: Pod,
    O: ElementOp,
{
    let source: &[[S; N]] =
        bytemuck::try_cast_slice(flat).map_err(|_| Error::InvalidBufferSize {
            expected: N,
            actual: flat.len(),
        })?;

    Ok(op.apply(source).flat().to_vec())
}
