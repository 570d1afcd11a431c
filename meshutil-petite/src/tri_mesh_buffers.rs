//! # Triangle Buffer Conversion
//!
//! Helper for turning polygon meshes into flat shaded triangle mesh buffers
//! for use with realtime rendering.
use crate::mesh::{IndexOptions, MeshUtil};
use crate::{Error, Result};
use itertools::Itertools;
use slice_of_array::prelude::*;

static EPSILON: f32 = 0.00000001;

type Vector = ultraviolet::vec::Vec3;
type Normal = Vector;
type Point = Vector;

/// Returns a flat [`u32`] triangle index buffer and two, flat matching point
/// and normal buffers.
///
/// All the triangles are disconnected. I.e. points & normals are duplicated
/// for each shared vertex. Faces are split exactly as by
/// [`MeshUtil::triangle_indices()`], so holes, degenerate faces and winding
/// are honored.
///
/// # Errors
///
/// `points` must hold three scalars per point and every triangle corner must
/// name one of them.
pub fn to_triangle_mesh_buffers(
    mesh_util: &MeshUtil,
    points: &[f32],
) -> Result<(Vec<u32>, Vec<[f32; 3]>, Vec<[f32; 3]>)> {
    if 0 != points.len() % 3 {
        let error = Error::InvalidBufferSize {
            expected: 3,
            actual: points.len(),
        };
        log::error!("{error} [{}]", mesh_util.id());
        return Err(error);
    }
    let points_nested = points.nest::<[_; 3]>();

    let triangles = mesh_util.triangle_indices(IndexOptions::default());

    if let Some(&index) = triangles
        .flat_indices()
        .iter()
        .find(|&&index| points_nested.len() <= index as usize)
    {
        let error = Error::IndexOutOfBounds {
            index: index as usize,
            max: points_nested.len(),
        };
        log::error!("{error} [{}]", mesh_util.id());
        return Err(error);
    }

    let topology = mesh_util.topology();
    let vertex_indices = topology.vertex_indices_per_face();
    let faces = topology.faces().collect_vec();

    let (triangle_points, normals): (Vec<[f32; 3]>, Vec<[f32; 3]>) = triangles
        .indices
        .iter()
        .zip(&triangles.primitive_params)
        .flat_map(|(triangle, param)| {
            let corners = index_as_points(triangle, points_nested);

            // Check for collinearity:
            let normal = triangle_normal(&corners)
                .or_else(|| {
                    let face = faces.get(param.face_index() as usize)?;
                    let polygon = face.corners(vertex_indices)?;
                    face_normal(&index_as_points(polygon, points_nested))
                })
                .unwrap_or_else(Vector::zero);

            corners
                .into_iter()
                .map(move |point| ([point.x, point.y, point.z], [normal.x, normal.y, normal.z]))
        })
        .unzip();

    let triangle_face_index = (0..triangle_points.len() as u32).collect();

    Ok((triangle_face_index, triangle_points, normals))
}

#[inline]
fn orthogonal(v0: &Point, v1: &Point, v2: &Point) -> Vector {
    (*v1 - *v0).cross(*v2 - *v1)
}

/// Points of `face` that exist in `points`.
#[inline]
pub(crate) fn index_as_points(face: &[u32], points: &[[f32; 3]]) -> Vec<Point> {
    face.iter()
        .filter_map(|&index| points.get(index as usize))
        .map(|point| Point::new(point[0], point[1], point[2]))
        .collect()
}

/// Computes the normal of a triangle, `None` if it is degenerate.
#[inline]
fn triangle_normal(corners: &[Point]) -> Option<Normal> {
    let [p0, p1, p2] = corners else {
        return None;
    };
    let normal = orthogonal(p0, p1, p2);
    let mag_sq = normal.mag_sq();

    (EPSILON <= mag_sq).then(|| normal / mag_sq.sqrt())
}

/// Computes the normal of a face.
/// Tries to do the right thing if the face
/// is non-planar or degenerate.
#[inline]
fn face_normal(points: &[Point]) -> Option<Normal> {
    let mut considered_edges = 0;

    let normal = points.iter().circular_tuple_windows::<(_, _, _)>().fold(
        Vector::zero(),
        |normal, corner| {
            let ortho_normal = orthogonal(corner.0, corner.1, corner.2);
            let mag_sq = ortho_normal.mag_sq();
            // Filter out collinear edge pairs.
            if mag_sq < EPSILON {
                normal
            } else {
                considered_edges += 1;
                normal + ortho_normal / mag_sq.sqrt()
            }
        },
    );

    if 0 == considered_edges {
        // Degenerate/zero size face.
        None
    } else {
        Some(normal.normalized())
    }
}
