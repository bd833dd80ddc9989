// Geometry typedefs shared by every stage of the mapping process.

pub type Vector2 = nalgebra::Vector2<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Point3 = nalgebra::Point3<f64>;
pub type Matrix3 = nalgebra::Matrix3<f64>;
pub type Matrix4 = nalgebra::Matrix4<f64>;
pub type Quaternion = nalgebra::UnitQuaternion<f64>;
pub type Isometry3 = nalgebra::Isometry3<f64>;

pub type FaceIdx = usize;
pub type VertexIdx = usize;

/// Upper 3x3 block of an affine transform, used to carry normals
/// from object into world space.
pub fn linear_part(transform: &Matrix4) -> Matrix3 {
    transform.fixed_slice::<3, 3>(0, 0).into_owned()
}

/// Polygon normal by Newell's method, robust for non-planar polygons.
/// Returns zero for degenerate polygons.
pub fn polygon_normal(points: &[Point3]) -> Vector3 {
    let mut n = Vector3::zeros();
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}
