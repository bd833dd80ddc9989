// Fixtures shared by unit tests.

use crate::criteria::*;
use crate::mesh::Mesh;
use crate::misc::*;

pub const CUBE_BOTTOM: FaceIdx = 0;
pub const CUBE_TOP: FaceIdx = 1;
pub const CUBE_FRONT: FaceIdx = 2;
pub const CUBE_BACK: FaceIdx = 3;
pub const CUBE_LEFT: FaceIdx = 4;
pub const CUBE_RIGHT: FaceIdx = 5;

pub const CUBE_PLY: &str = "ply
format ascii 1.0
comment unit cube centered at origin
element vertex 8
property float x
property float y
property float z
element face 6
property list uchar int vertex_indices
end_header
-0.5 -0.5 -0.5
0.5 -0.5 -0.5
0.5 0.5 -0.5
-0.5 0.5 -0.5
-0.5 -0.5 0.5
0.5 -0.5 0.5
0.5 0.5 0.5
-0.5 0.5 0.5
4 0 3 2 1
4 4 5 6 7
4 0 1 5 4
4 2 3 7 6
4 0 4 7 3
4 1 2 6 5
";

/// Unit cube centered at the origin with outward quad faces, in the
/// order of the `CUBE_*` constants.
pub fn unit_cube() -> Mesh {
    let vertices = vec![
        Point3::new(-0.5, -0.5, -0.5),
        Point3::new(0.5, -0.5, -0.5),
        Point3::new(0.5, 0.5, -0.5),
        Point3::new(-0.5, 0.5, -0.5),
        Point3::new(-0.5, -0.5, 0.5),
        Point3::new(0.5, -0.5, 0.5),
        Point3::new(0.5, 0.5, 0.5),
        Point3::new(-0.5, 0.5, 0.5),
    ];
    let faces = vec![
        vec![0, 3, 2, 1],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![2, 3, 7, 6],
        vec![0, 4, 7, 3],
        vec![1, 2, 6, 5],
    ];
    Mesh::new("Cube", vertices, faces).unwrap()
}

pub fn top_criteria(tolerance: f64) -> SelectionCriteria {
    SelectionCriteria::new(
        Axis::Z,
        Extremum::MaxCoord,
        tolerance,
        NormalFilter::Positive,
    )
    .unwrap()
}

/// Default host camera: 36x24 mm sensor behind a 50 mm lens.
pub fn perspective_camera(
    location: [f64; 3],
    rotation: [f64; 3],
) -> CameraPose {
    CameraPose::from_euler(
        location,
        rotation,
        Projection::Perspective(Intrinsics::new(36.0, 24.0, 50.0).unwrap()),
    )
}
