use std::io::{BufRead, BufReader};
use std::path::Path;

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use base::defs::{Error, ErrorKind::*, Result};
use base::util::fs;

use crate::mesh::Mesh;
use crate::misc::*;

const FACE_INDEX_KEYS: [&str; 2] = ["vertex_indices", "vertex_index"];

#[derive(Debug)]
pub struct ImportedMesh {
    pub mesh: Mesh,
    pub dropped_faces: usize, // Had less than 3 distinct corners.
}

/// Imports a PLY file, naming the mesh after the file stem.
pub fn import_ply_file<P: AsRef<Path>>(path: P) -> Result<ImportedMesh> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let reader = BufReader::new(fs::open_file(path)?);
    import_ply(reader, name)
}

/// Reads vertices and polygon faces from ASCII or binary PLY data.
/// Polygons are kept as they are, without triangulation.
pub fn import_ply<R: BufRead>(
    mut reader: R,
    name: &str,
) -> Result<ImportedMesh> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut reader).map_err(|e| {
        let desc = format!("failed to parse PLY data of mesh '{}'", name);
        Error::with_source(MalformedData, desc, e)
    })?;

    let elements = |key: &str| ply.payload.get(key).into_iter().flatten();

    let mut vertices = vec![];
    for (i, element) in elements("vertex").enumerate() {
        let coord = |key| {
            scalar_property(element, key).ok_or_else(|| {
                let desc = format!("vertex {} lacks coordinate '{}'", i, key);
                Error::new(MalformedData, desc)
            })
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let mut polygons = vec![];
    let mut dropped_faces = 0;
    for (i, element) in elements("face").enumerate() {
        let polygon = index_list(element).ok_or_else(|| {
            let desc = format!("face {} lacks vertex indices", i);
            Error::new(MalformedData, desc)
        })?;
        let polygon = polygon
            .into_iter()
            .map(|v| match usize::try_from(v) {
                Ok(v) if v < vertices.len() => Ok(v),
                _ => {
                    let desc =
                        format!("face {} refers to unknown vertex {}", i, v);
                    Err(Error::new(MalformedData, desc))
                }
            })
            .collect::<Result<Vec<VertexIdx>>>()?;

        if num_distinct(&polygon) < 3 {
            dropped_faces += 1;
        } else {
            polygons.push(polygon);
        }
    }

    Ok(ImportedMesh {
        mesh: Mesh::new(name, vertices, polygons)?,
        dropped_faces,
    })
}

fn scalar_property(element: &DefaultElement, key: &str) -> Option<f64> {
    Some(match element.get(key)? {
        Property::Float(v) => *v as f64,
        Property::Double(v) => *v,
        Property::Int(v) => *v as f64,
        Property::UInt(v) => *v as f64,
        Property::Short(v) => *v as f64,
        Property::UShort(v) => *v as f64,
        Property::Char(v) => *v as f64,
        Property::UChar(v) => *v as f64,
        _ => return None,
    })
}

fn index_list(element: &DefaultElement) -> Option<Vec<i64>> {
    let prop = FACE_INDEX_KEYS.iter().find_map(|&key| element.get(key))?;
    Some(match prop {
        Property::ListInt(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListUInt(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListShort(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListUShort(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListChar(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListUChar(v) => v.iter().map(|&i| i as i64).collect(),
        _ => return None,
    })
}

fn num_distinct(polygon: &[VertexIdx]) -> usize {
    let mut sorted = polygon.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}
