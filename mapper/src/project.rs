use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::criteria::{CameraPose, Projection};
use crate::mesh::Mesh;
use crate::misc::*;

/// Coordinates given to corners that are not strictly in front of a
/// perspective camera. Faces straddling the camera plane get visibly
/// distorted by this, as they are neither clipped nor subdivided.
pub const BEHIND_CAMERA_UV: [f64; 2] = [0.5, 0.5];

/// Texture coordinates keyed by (face, corner within face).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UvAssignment {
    pub uvs: BTreeMap<(FaceIdx, usize), Vector2>,
    pub behind_camera: usize, // Corners given the fallback coordinates.
}

impl UvAssignment {
    pub fn len(&self) -> usize {
        self.uvs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uvs.is_empty()
    }
}

/// Projects a point given in camera space onto normalized image
/// coordinates. Returns None for perspective points not strictly in
/// front of the camera. Not clamped to [0, 1].
pub fn project_view_point(
    projection: &Projection,
    view: &Point3,
) -> Option<Vector2> {
    match projection {
        Projection::Perspective(intrinsics) => {
            // The camera looks down its -Z axis.
            if view.z >= 0.0 {
                return None;
            }
            let fov_factor = (intrinsics.fov() / 2.0).tan();
            let aspect = intrinsics.aspect();

            let screen_x = view.x / -view.z;
            let screen_y = view.y / -view.z;

            Some(Vector2::new(
                0.5 + screen_x / (2.0 * fov_factor * aspect),
                0.5 + screen_y / (2.0 * fov_factor),
            ))
        }
        Projection::Orthographic { uv_scale } => Some(Vector2::new(
            0.5 + view.x / uv_scale,
            0.5 + view.y / uv_scale,
        )),
    }
}

/// Computes texture coordinates for every corner of the given faces as
/// seen by the camera. Each corner is independent, so faces are
/// projected in parallel.
pub fn project_faces(
    mesh: &Mesh,
    pose: &CameraPose,
    faces: &[FaceIdx],
) -> UvAssignment {
    let world_to_camera = pose.world_to_camera();

    let corners: Vec<((FaceIdx, usize), Option<Vector2>)> = faces
        .par_iter()
        .flat_map_iter(|&f| {
            mesh.faces[f]
                .vertices
                .iter()
                .enumerate()
                .map(move |(corner, &v)| (f, corner, v))
        })
        .map(|(f, corner, v)| {
            // Object space, to world space, to camera space.
            let world = mesh.world_vertex(v);
            let view = world_to_camera.transform_point(&world);
            ((f, corner), project_view_point(&pose.projection, &view))
        })
        .collect();

    let mut assignment = UvAssignment::default();
    for (key, uv) in corners {
        let uv = uv.unwrap_or_else(|| {
            assignment.behind_camera += 1;
            Vector2::from(BEHIND_CAMERA_UV)
        });
        assignment.uvs.insert(key, uv);
    }
    assignment
}
