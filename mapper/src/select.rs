use base::defs::{Error, ErrorKind::*, Result};

use crate::criteria::{Extremum, SelectionCriteria};
use crate::mesh::Mesh;
use crate::misc::*;

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionResult {
    pub faces: Vec<FaceIdx>, // Ascending.
    pub extremum: f64,
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Picks the faces hugging the criteria's extremum. The extremum is taken
/// over all mesh vertices in world space, and a face qualifies only when
/// every one of its vertices lies within tolerance of it.
pub fn select_faces(
    mesh: &Mesh,
    criteria: &SelectionCriteria,
) -> Result<SelectionResult> {
    let k = criteria.axis.index();
    let coords: Vec<f64> =
        mesh.world_vertices().iter().map(|p| p[k]).collect();

    let extremum = match criteria.mode {
        Extremum::MaxCoord => coords.iter().copied().reduce(f64::max),
        Extremum::MinCoord => coords.iter().copied().reduce(f64::min),
    }
    .ok_or_else(|| {
        let desc =
            format!("cannot select faces of vertexless mesh '{}'", mesh.name);
        Error::new(MalformedData, desc)
    })?;

    let normal_matrix = linear_part(&mesh.transform);

    let faces = mesh
        .faces
        .iter()
        .enumerate()
        .filter(|(_, face)| {
            face.vertices
                .iter()
                .all(|&v| criteria.accepts_coord(coords[v], extremum))
        })
        .filter(|(_, face)| {
            let normal = normal_matrix * face.normal;
            criteria.normal_filter.accepts(normal[k])
        })
        .map(|(f, _)| f)
        .collect();

    Ok(SelectionResult { faces, extremum })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::*;
    use crate::testing::*;
    use base::assert_eq_f64;

    fn criteria(
        axis: Axis,
        mode: Extremum,
        tolerance: f64,
        normal_filter: NormalFilter,
    ) -> SelectionCriteria {
        SelectionCriteria::new(axis, mode, tolerance, normal_filter).unwrap()
    }

    // Staircase of unit squares facing +Z at heights 0, 1, 2, 3, plus one
    // slanted quad whose corners span heights 2.5 to 3.
    fn staircase() -> Mesh {
        let mut vertices = vec![];
        let mut faces = vec![];
        for step in 0..4 {
            let (x, z) = (step as f64, step as f64);
            let first = vertices.len();
            vertices.push(Point3::new(x, 0.0, z));
            vertices.push(Point3::new(x + 1.0, 0.0, z));
            vertices.push(Point3::new(x + 1.0, 1.0, z));
            vertices.push(Point3::new(x, 1.0, z));
            faces.push(vec![first, first + 1, first + 2, first + 3]);
        }
        let first = vertices.len();
        vertices.push(Point3::new(0.0, 2.0, 2.5));
        vertices.push(Point3::new(1.0, 2.0, 2.5));
        vertices.push(Point3::new(1.0, 3.0, 3.0));
        vertices.push(Point3::new(0.0, 3.0, 3.0));
        faces.push(vec![first, first + 1, first + 2, first + 3]);
        Mesh::new("Staircase", vertices, faces).unwrap()
    }

    #[test]
    fn test_select_cube_top() {
        let res = select_faces(&unit_cube(), &top_criteria(1.5)).unwrap();
        assert_eq!(res.faces, vec![CUBE_TOP]);
        assert_eq_f64!(res.extremum, 0.5);
    }

    #[test]
    fn test_select_cube_bottom() {
        let c =
            criteria(Axis::Z, Extremum::MinCoord, 1.5, NormalFilter::Negative);
        let res = select_faces(&unit_cube(), &c).unwrap();
        assert_eq!(res.faces, vec![CUBE_BOTTOM]);
        assert_eq_f64!(res.extremum, -0.5);
    }

    #[test]
    fn test_select_ignoring_normals() {
        // Large tolerance admits every face once normals are ignored.
        let c =
            criteria(Axis::Z, Extremum::MaxCoord, 1.5, NormalFilter::Ignore);
        let res = select_faces(&unit_cube(), &c).unwrap();
        assert_eq!(res.faces, (0..6).collect::<Vec<_>>());

        // With zero tolerance side faces have corners off the extremum.
        let c =
            criteria(Axis::Z, Extremum::MaxCoord, 0.0, NormalFilter::Ignore);
        let res = select_faces(&unit_cube(), &c).unwrap();
        assert_eq!(res.faces, vec![CUBE_TOP]);
    }

    #[test]
    fn test_select_on_other_axes() {
        let c =
            criteria(Axis::X, Extremum::MaxCoord, 0.1, NormalFilter::Positive);
        let res = select_faces(&unit_cube(), &c).unwrap();
        assert_eq!(res.faces, vec![CUBE_RIGHT]);

        let c =
            criteria(Axis::X, Extremum::MinCoord, 0.1, NormalFilter::Negative);
        let res = select_faces(&unit_cube(), &c).unwrap();
        assert_eq!(res.faces, vec![CUBE_LEFT]);

        let c =
            criteria(Axis::Y, Extremum::MaxCoord, 0.1, NormalFilter::Positive);
        let res = select_faces(&unit_cube(), &c).unwrap();
        assert_eq!(res.faces, vec![CUBE_BACK]);

        let c =
            criteria(Axis::Y, Extremum::MinCoord, 0.1, NormalFilter::Negative);
        let res = select_faces(&unit_cube(), &c).unwrap();
        assert_eq!(res.faces, vec![CUBE_FRONT]);
    }

    #[test]
    fn test_select_wrong_normal_direction() {
        // The top face points up, so asking for downward faces at the top
        // yields nothing, which is not an error.
        let c =
            criteria(Axis::Z, Extremum::MaxCoord, 0.1, NormalFilter::Negative);
        let res = select_faces(&unit_cube(), &c).unwrap();
        assert!(res.is_empty());
    }

    #[test]
    fn test_select_uses_world_space() {
        // Flipped upside down, the local bottom face becomes the top.
        let flip = Matrix4::from_axis_angle(
            &Vector3::x_axis(),
            std::f64::consts::PI,
        );
        let cube = unit_cube().with_transform(flip);
        let res = select_faces(&cube, &top_criteria(0.1)).unwrap();
        assert_eq!(res.faces, vec![CUBE_BOTTOM]);

        let lifted = unit_cube()
            .with_transform(Matrix4::new_translation(&(Vector3::z() * 7.0)));
        let res = select_faces(&lifted, &top_criteria(0.1)).unwrap();
        assert_eq!(res.faces, vec![CUBE_TOP]);
        assert_eq_f64!(res.extremum, 7.5);
    }

    #[test]
    fn test_select_requires_all_vertices() {
        let stairs = staircase();
        let select = |tolerance| {
            select_faces(&stairs, &top_criteria(tolerance)).unwrap().faces
        };
        assert_eq!(select(0.0), vec![3]);
        assert_eq!(select(0.4), vec![3]);
        assert_eq!(select(0.5), vec![3, 4]);
        assert_eq!(select(1.0), vec![2, 3, 4]);
        assert_eq!(select(3.0), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_select_tolerance_is_monotonic() {
        let stairs = staircase();
        let tolerances = [0.0, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 2.5, 3.0];
        for pair in tolerances.windows(2) {
            let smaller = select_faces(&stairs, &top_criteria(pair[0]))
                .unwrap()
                .faces;
            let larger = select_faces(&stairs, &top_criteria(pair[1]))
                .unwrap()
                .faces;
            assert!(smaller.iter().all(|f| larger.contains(f)));
        }
    }

    #[test]
    fn test_ignore_is_superset_of_signed_filters() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for mode in [Extremum::MaxCoord, Extremum::MinCoord] {
                let select = |filter| {
                    let c = criteria(axis, mode, 1.0, filter);
                    select_faces(&unit_cube(), &c).unwrap().faces
                };
                let all = select(NormalFilter::Ignore);
                for f in select(NormalFilter::Positive)
                    .into_iter()
                    .chain(select(NormalFilter::Negative))
                {
                    assert!(all.contains(&f));
                }
            }
        }
    }

    #[test]
    fn test_select_vertexless_mesh() {
        let empty = Mesh::new("Empty", vec![], vec![]).unwrap();
        let err = select_faces(&empty, &top_criteria(1.0)).unwrap_err();
        assert_eq!(err.kind, MalformedData);
        assert_eq!(
            &err.description,
            "cannot select faces of vertexless mesh 'Empty'"
        );
    }
}
