use base::defs::{Error, ErrorKind::*, Result};

use crate::material::MaterialHandle;
use crate::misc::*;

pub const DEFAULT_UV_MAP_NAME: &str = "UVMap";
pub const MAX_MATERIAL_SLOTS: usize = 32767;

#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub vertices: Vec<VertexIdx>,
    pub normal: Vector3, // In object space.
}

/// Texture coordinates stored per face corner, so that a vertex shared
/// by faces of different cameras can carry different coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct UvLayer {
    pub name: String,
    pub coords: Vec<Vec<Vector2>>,
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Point3>,
    pub faces: Vec<Face>,
    pub transform: Matrix4, // Object to world.
    pub uv_layer: Option<UvLayer>,
    pub face_materials: Vec<usize>,
    pub material_slots: Vec<Option<MaterialHandle>>,
}

impl Mesh {
    /// Builds a mesh from polygons given as vertex index lists, computing
    /// face normals from the winding order.
    pub fn new(
        name: &str,
        vertices: Vec<Point3>,
        polygons: Vec<Vec<VertexIdx>>,
    ) -> Result<Mesh> {
        let mut faces = Vec::with_capacity(polygons.len());
        for (i, polygon) in polygons.into_iter().enumerate() {
            if polygon.len() < 3 {
                let desc = format!("face {} has less than 3 vertices", i);
                return Err(Error::new(MalformedData, desc));
            }
            if let Some(&v) = polygon.iter().find(|&&v| v >= vertices.len()) {
                let desc =
                    format!("face {} refers to unknown vertex {}", i, v);
                return Err(Error::new(MalformedData, desc));
            }
            let points: Vec<Point3> =
                polygon.iter().map(|&v| vertices[v]).collect();
            faces.push(Face {
                normal: polygon_normal(&points),
                vertices: polygon,
            });
        }

        let num_faces = faces.len();
        Ok(Mesh {
            name: name.to_string(),
            vertices,
            faces,
            transform: Matrix4::identity(),
            uv_layer: None,
            face_materials: vec![0; num_faces],
            material_slots: vec![],
        })
    }

    pub fn with_transform(mut self, transform: Matrix4) -> Mesh {
        self.transform = transform;
        self
    }

    pub fn world_vertex(&self, v: VertexIdx) -> Point3 {
        self.transform.transform_point(&self.vertices[v])
    }

    pub fn world_vertices(&self) -> Vec<Point3> {
        self.vertices
            .iter()
            .map(|p| self.transform.transform_point(p))
            .collect()
    }

    /// Face normal carried by the linear part of the object transform.
    /// Not renormalized: only its direction is meaningful.
    pub fn world_normal(&self, f: FaceIdx) -> Vector3 {
        linear_part(&self.transform) * self.faces[f].normal
    }

    /// Adds a UV layer unless one exists. Returns whether it was created.
    pub fn ensure_uv_layer(&mut self, name: &str) -> bool {
        if self.uv_layer.is_some() {
            return false;
        }
        let coords = self
            .faces
            .iter()
            .map(|f| vec![Vector2::zeros(); f.vertices.len()])
            .collect();
        self.uv_layer = Some(UvLayer {
            name: name.to_string(),
            coords,
        });
        true
    }

    pub fn uv(&self, f: FaceIdx, corner: usize) -> Option<Vector2> {
        self.uv_layer.as_ref().map(|layer| layer.coords[f][corner])
    }

    pub fn set_uv(&mut self, f: FaceIdx, corner: usize, uv: Vector2) {
        if self.uv_layer.is_none() {
            self.ensure_uv_layer(DEFAULT_UV_MAP_NAME);
        }
        if let Some(layer) = self.uv_layer.as_mut() {
            layer.coords[f][corner] = uv;
        }
    }

    /// Grows the slot list so that `slot` is addressable. Never shrinks.
    pub fn ensure_material_slot(&mut self, slot: usize) {
        if self.material_slots.len() <= slot {
            self.material_slots.resize(slot + 1, None);
        }
    }

    pub fn assign_material_slot(&mut self, faces: &[FaceIdx], slot: usize) {
        for &f in faces {
            self.face_materials[f] = slot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::unit_cube;
    use base::assert_eq_vector3;

    #[test]
    fn test_new_rejects_bad_faces() {
        let vertices = vec![Point3::origin(); 3];

        let err = Mesh::new("m", vertices.clone(), vec![vec![0, 1]])
            .unwrap_err();
        assert_eq!(err.kind, MalformedData);
        assert_eq!(&err.description, "face 0 has less than 3 vertices");

        let err =
            Mesh::new("m", vertices, vec![vec![0, 1, 3]]).unwrap_err();
        assert_eq!(err.kind, MalformedData);
        assert_eq!(&err.description, "face 0 refers to unknown vertex 3");
    }

    #[test]
    fn test_cube_normals_point_outwards() {
        let cube = unit_cube();
        for (f, face) in cube.faces.iter().enumerate() {
            let center = face
                .vertices
                .iter()
                .map(|&v| cube.vertices[v].coords)
                .sum::<Vector3>()
                / face.vertices.len() as f64;
            assert!(center.dot(&cube.world_normal(f)) > 0.0);
        }
    }

    #[test]
    fn test_world_space_follows_transform() {
        let transform = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 2.0))
            * Matrix4::from_axis_angle(
                &Vector3::x_axis(),
                std::f64::consts::PI,
            );
        let cube = unit_cube().with_transform(transform);

        // Top face flips to the bottom.
        assert_eq_vector3!(cube.world_normal(1), Vector3::new(0.0, 0.0, -1.0));
        assert_eq_vector3!(cube.world_vertex(4), Point3::new(-0.5, 0.5, 1.5));
    }

    #[test]
    fn test_uv_layer_and_slots() {
        let mut cube = unit_cube();
        assert_eq!(cube.uv(0, 0), None);
        assert!(cube.ensure_uv_layer("UVMap"));
        assert!(!cube.ensure_uv_layer("Other"));
        assert_eq!(cube.uv_layer.as_ref().unwrap().name, "UVMap");
        assert_eq!(cube.uv(5, 3), Some(Vector2::zeros()));

        cube.set_uv(5, 3, Vector2::new(0.25, 0.75));
        assert_eq!(cube.uv(5, 3), Some(Vector2::new(0.25, 0.75)));

        cube.ensure_material_slot(2);
        assert_eq!(cube.material_slots.len(), 3);
        cube.ensure_material_slot(0);
        assert_eq!(cube.material_slots.len(), 3);

        cube.assign_material_slot(&[1, 3], 2);
        assert_eq!(cube.face_materials, vec![0, 2, 0, 2, 0, 0]);
    }
}
