//! Tests for fan triangulation.

use meshutil_petite::mesh::{IndexOptions, MeshUtil, TopologyIssues};
use meshutil_petite::primitive_param::{EdgeFlag, PrimitiveParam};
use meshutil_petite::primvar::{PrimvarRef, PrimvarType};
use meshutil_petite::{Error, TopologyDescriptor};

const WITH_EDGES: IndexOptions = IndexOptions { edge_indices: true };

/// Three quads in a row.
///
/// ```text
/// 4---5---6---7
/// | 0 | 1 | 2 |
/// 0---1---2---3
/// ```
const STRIP_COUNTS: [u32; 3] = [4, 4, 4];
const STRIP_INDICES: [u32; 12] = [0, 1, 5, 4, 1, 2, 6, 5, 2, 3, 7, 6];

fn face_and_flag(params: &[PrimitiveParam]) -> Vec<(u32, EdgeFlag)> {
    params
        .iter()
        .map(|param| (param.face_index(), param.edge_flag()))
        .collect()
}

#[test]
fn test_triangles_pass_through() {
    let topology = TopologyDescriptor::new(4, &[3, 3], &[0, 1, 2, 2, 1, 3]);
    let mesh_util = MeshUtil::new(&topology, "/triangles");

    let triangles = mesh_util.triangle_indices(IndexOptions::default());

    assert_eq!(triangles.indices, vec![[0, 1, 2], [2, 1, 3]]);
    assert_eq!(triangles.flat_indices(), topology.vertex_indices_per_face());
    assert_eq!(
        face_and_flag(&triangles.primitive_params),
        vec![(0, EdgeFlag::Authored), (1, EdgeFlag::Authored)]
    );
    assert_eq!(triangles.edge_indices, None);
    assert!(triangles.issues.is_valid());
}

#[test]
fn test_single_triangle() {
    let topology = TopologyDescriptor::new(3, &[3], &[0, 1, 2]);
    let triangles = MeshUtil::new(&topology, "/triangle").triangle_indices(WITH_EDGES);

    assert_eq!(triangles.indices, vec![[0, 1, 2]]);
    assert_eq!(triangles.primitive_params, vec![PrimitiveParam(0)]);
    assert_eq!(triangles.edge_indices, Some(vec![0]));
}

#[test]
fn test_pentagon_fan() {
    let topology = TopologyDescriptor::new(5, &[5], &[0, 1, 2, 3, 4]);
    let triangles = MeshUtil::new(&topology, "/pentagon").triangle_indices(WITH_EDGES);

    assert_eq!(triangles.indices, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
    assert_eq!(
        face_and_flag(&triangles.primitive_params),
        vec![
            (0, EdgeFlag::First),
            (0, EdgeFlag::Interior),
            (0, EdgeFlag::Last)
        ]
    );
    // Each triangle lies on the authored edge opposite the fan apex.
    assert_eq!(triangles.edge_indices, Some(vec![1, 2, 3]));
}

#[test]
fn test_left_handed_quad() {
    let mut topology = TopologyDescriptor::new(4, &[4], &[0, 1, 2, 3]);
    topology.left_handed(true);
    let triangles = MeshUtil::new(&topology, "/quad").triangle_indices(WITH_EDGES);

    // 0-2-1 and 0-3-2, rotated so the fan edge 0-2 stays in the flagged slot.
    assert_eq!(triangles.indices, vec![[2, 1, 0], [2, 0, 3]]);
    assert_eq!(
        face_and_flag(&triangles.primitive_params),
        vec![(0, EdgeFlag::First), (0, EdgeFlag::Last)]
    );
    // The flipped walk enumerates 0-3, 3-2, 2-1, 1-0.
    assert_eq!(triangles.edge_indices, Some(vec![2, 1]));
}

#[test]
fn test_left_handed_triangle() {
    let mut topology = TopologyDescriptor::new(3, &[3], &[0, 1, 2]);
    topology.left_handed(true);
    let triangles = MeshUtil::new(&topology, "/triangle").triangle_indices(WITH_EDGES);

    assert_eq!(triangles.indices, vec![[0, 2, 1]]);
    assert_eq!(triangles.primitive_params, vec![PrimitiveParam(0)]);
    assert_eq!(triangles.edge_indices, Some(vec![0]));
}

#[test]
fn test_hole_in_strip() {
    let mut topology = TopologyDescriptor::new(8, &STRIP_COUNTS, &STRIP_INDICES);
    topology.holes(&[1]);
    let triangles = MeshUtil::new(&topology, "/strip").triangle_indices(WITH_EDGES);

    assert_eq!(
        triangles.indices,
        vec![[0, 1, 5], [0, 5, 4], [2, 3, 7], [2, 7, 6]]
    );
    assert_eq!(
        face_and_flag(&triangles.primitive_params),
        vec![
            (0, EdgeFlag::First),
            (0, EdgeFlag::Last),
            (2, EdgeFlag::First),
            (2, EdgeFlag::Last)
        ]
    );
    assert_eq!(triangles.edge_indices, Some(vec![1, 2, 9, 10]));
    assert!(triangles.issues.is_valid());
}

#[test]
fn test_holes_ignored_when_refined() {
    let mut topology = TopologyDescriptor::new(8, &STRIP_COUNTS, &STRIP_INDICES);
    topology.holes(&[1]).refine_level(1);
    let triangles = MeshUtil::new(&topology, "/strip").triangle_indices(IndexOptions::default());

    assert_eq!(triangles.len(), 6);
}

#[test]
fn test_degenerate_faces_are_skipped() {
    let topology = TopologyDescriptor::new(7, &[3, 2, 4, 0], &[0, 1, 2, 2, 3, 3, 4, 5, 6]);
    let triangles =
        MeshUtil::new(&topology, "/degenerate").triangle_indices(IndexOptions::default());

    // Triangle count is the sum of `count - 2` over the valid faces.
    assert_eq!(triangles.indices, vec![[0, 1, 2], [3, 4, 5], [3, 5, 6]]);
    assert_eq!(
        face_and_flag(&triangles.primitive_params),
        vec![
            (0, EdgeFlag::Authored),
            (2, EdgeFlag::First),
            (2, EdgeFlag::Last)
        ]
    );
    assert_eq!(
        triangles.issues,
        TopologyIssues {
            degenerate_faces: 2,
            ..Default::default()
        }
    );
}

#[test]
fn test_degenerate_hole_does_not_shadow_later_holes() {
    let mut topology = TopologyDescriptor::new(6, &[3, 1, 3, 3], &[0, 1, 2, 2, 2, 3, 4, 3, 4, 5]);
    topology.holes(&[1, 2]);
    let triangles = MeshUtil::new(&topology, "/holes").triangle_indices(IndexOptions::default());

    assert_eq!(triangles.indices, vec![[0, 1, 2], [3, 4, 5]]);
    assert_eq!(triangles.primitive_params[1].face_index(), 3);
}

#[test]
fn test_overrun_face() {
    // The second face claims more indices than there are.
    let topology = TopologyDescriptor::new(4, &[3, 3], &[0, 1, 2, 3]);
    let triangles = MeshUtil::new(&topology, "/overrun").triangle_indices(IndexOptions::default());

    assert_eq!(triangles.indices, vec![[0, 1, 2], [0, 0, 0]]);
    assert_eq!(triangles.primitive_params[1].face_index(), 1);
    assert_eq!(triangles.issues.overrun_faces, 1);
    assert!(!triangles.issues.is_valid());
}

#[test]
fn test_partial_overrun_zero_fills_face() -> anyhow::Result<()> {
    // A pentagon with only four indices: the in-range fan triangle is dropped too.
    let topology = TopologyDescriptor::new(4, &[5], &[0, 1, 2, 3]);
    let mesh_util = MeshUtil::new(&topology, "/partial");
    let triangles = mesh_util.triangle_indices(IndexOptions::default());

    assert_eq!(triangles.indices, vec![[0, 0, 0]; 3]);
    assert_eq!(
        face_and_flag(&triangles.primitive_params),
        vec![
            (0, EdgeFlag::First),
            (0, EdgeFlag::Interior),
            (0, EdgeFlag::Last)
        ]
    );
    assert_eq!(triangles.issues.overrun_faces, 1);

    let values = [1.0f32, 2.0, 3.0, 4.0];
    let source = PrimvarRef::new(PrimvarType::Float, &values[..]);
    let result = mesh_util.triangulate_face_varying(source)?;
    assert_eq!(result.primvar.as_f32(), Some(&[0.0; 9][..]));
    assert_eq!(result.issues.overrun_faces, 1);

    Ok(())
}

#[test]
fn test_face_varying_quad() -> anyhow::Result<()> {
    let topology = TopologyDescriptor::new(4, &[4], &[0, 1, 2, 3]);
    let mesh_util = MeshUtil::new(&topology, "/quad");

    let values = [10.0f32, 11.0, 12.0, 13.0];
    let source = PrimvarRef::new(PrimvarType::Float, &values[..]);
    let result = mesh_util.triangulate_face_varying(source)?;

    assert_eq!(result.primvar.primvar_type, PrimvarType::Float);
    assert_eq!(
        result.primvar.as_f32(),
        Some(&[10.0, 11.0, 12.0, 10.0, 12.0, 13.0][..])
    );
    assert!(result.issues.is_valid());

    Ok(())
}

#[test]
fn test_face_varying_matches_indices() -> anyhow::Result<()> {
    let mut topology = TopologyDescriptor::new(8, &STRIP_COUNTS, &STRIP_INDICES);
    topology.holes(&[1]).left_handed(true);
    let mesh_util = MeshUtil::new(&topology, "/strip");

    // Use the point indices as face-varying values.
    let values = STRIP_INDICES
        .iter()
        .flat_map(|&index| [index as f64, -(index as f64)])
        .collect::<Vec<_>>();
    let source = PrimvarRef::new(PrimvarType::DoubleVec2, &values[..]);
    let result = mesh_util.triangulate_face_varying(source)?;

    let expected = mesh_util
        .triangle_indices(IndexOptions::default())
        .flat_indices()
        .iter()
        .flat_map(|&index| [index as f64, -(index as f64)])
        .collect::<Vec<_>>();
    assert_eq!(result.primvar.len(), 12);
    assert_eq!(result.primvar.as_f64(), Some(&expected[..]));

    Ok(())
}

#[test]
fn test_face_varying_overrun() -> anyhow::Result<()> {
    let topology = TopologyDescriptor::new(4, &[3, 3], &[0, 1, 2, 0, 2, 3]);
    let mesh_util = MeshUtil::new(&topology, "/short");

    let values = [1.0f32, 2.0, 3.0, 4.0];
    let source = PrimvarRef::new(PrimvarType::Float, &values[..]);
    let result = mesh_util.triangulate_face_varying(source)?;

    assert_eq!(
        result.primvar.as_f32(),
        Some(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0][..])
    );
    assert_eq!(result.issues.overrun_faces, 1);

    Ok(())
}

#[test]
fn test_face_varying_rejects_integers() {
    let topology = TopologyDescriptor::new(3, &[3], &[0, 1, 2]);
    let mesh_util = MeshUtil::new(&topology, "/triangle");

    let values = [1i32, 2, 3];
    assert_eq!(
        mesh_util.triangulate_face_varying(PrimvarRef::new(PrimvarType::Int, &values[..])),
        Err(Error::UnsupportedPrimvarType {
            operation: "face-varying triangulation",
            primvar_type: PrimvarType::Int,
        })
    );

    // Storage that does not match the tag is rejected the same way.
    let values = [1.0f64, 2.0, 3.0];
    assert!(matches!(
        mesh_util.triangulate_face_varying(PrimvarRef::new(PrimvarType::Float, &values[..])),
        Err(Error::UnsupportedPrimvarType { .. })
    ));
}

#[test]
fn test_face_varying_rejects_ragged_buffer() {
    let topology = TopologyDescriptor::new(3, &[3], &[0, 1, 2]);
    let mesh_util = MeshUtil::new(&topology, "/triangle");

    let values = [0.0f32; 5];
    assert_eq!(
        mesh_util.triangulate_face_varying(PrimvarRef::new(PrimvarType::FloatVec2, &values[..])),
        Err(Error::InvalidBufferSize {
            expected: 2,
            actual: 5
        })
    );
}
