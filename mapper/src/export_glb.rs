use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{json, Value};

use base::defs::{IntoResult, Result};
use base::util::fs;

use crate::material::{MaterialHandle, Materials, TextureHandle};
use crate::mesh::Mesh;
use crate::misc::*;

const GLB_MAGIC: u32 = 0x46546C67; // "glTF"
const GLB_VERSION: u32 = 2;
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;
const CHUNK_TYPE_BIN: u32 = 0x004E4942;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

const GENERATOR: &str = concat!("mapper ", env!("CARGO_PKG_VERSION"));

pub fn export_glb<P: AsRef<Path>>(
    mesh: &Mesh,
    materials: &Materials,
    path: P,
) -> Result<()> {
    let glb = build_glb(mesh, materials)?;
    fs::write_file(path, &glb)
}

/// Encodes the mesh as binary glTF with one primitive per material slot
/// in use. Corners are not shared between faces, so every face keeps its
/// own normal and texture coordinates. Positions and normals are baked
/// into world space.
pub fn build_glb(mesh: &Mesh, materials: &Materials) -> Result<Vec<u8>> {
    let mut faces_by_slot = BTreeMap::<usize, Vec<FaceIdx>>::new();
    for (f, &slot) in mesh.face_materials.iter().enumerate() {
        faces_by_slot.entry(slot).or_default().push(f);
    }

    let mut bin = BinBuilder::default();
    let mut accessors = vec![];
    let mut primitives = vec![];
    let mut gltf_materials = vec![];
    let mut material_indices = IndexMap::<MaterialHandle, usize>::new();
    let mut textures = IndexMap::<TextureHandle, usize>::new();

    for (&slot, faces) in &faces_by_slot {
        let corners = Corners::collect(mesh, faces);

        let mut attributes = serde_json::Map::new();
        let (min, max) = bounds(&corners.positions);
        attributes.insert("POSITION".to_string(), json!(accessors.len()));
        accessors.push(json!({
            "bufferView": bin.push(&floats_to_bytes(&corners.positions),
                ARRAY_BUFFER),
            "componentType": FLOAT,
            "count": corners.positions.len() / 3,
            "type": "VEC3",
            "min": min,
            "max": max,
        }));

        attributes.insert("NORMAL".to_string(), json!(accessors.len()));
        accessors.push(json!({
            "bufferView": bin.push(&floats_to_bytes(&corners.normals),
                ARRAY_BUFFER),
            "componentType": FLOAT,
            "count": corners.normals.len() / 3,
            "type": "VEC3",
        }));

        if let Some(uvs) = &corners.uvs {
            let accessor = json!(accessors.len());
            attributes.insert("TEXCOORD_0".to_string(), accessor);
            accessors.push(json!({
                "bufferView": bin.push(&floats_to_bytes(uvs), ARRAY_BUFFER),
                "componentType": FLOAT,
                "count": uvs.len() / 2,
                "type": "VEC2",
            }));
        }

        let indices = accessors.len();
        accessors.push(json!({
            "bufferView": bin.push(&u32s_to_bytes(&corners.indices),
                ELEMENT_ARRAY_BUFFER),
            "componentType": UNSIGNED_INT,
            "count": corners.indices.len(),
            "type": "SCALAR",
        }));

        let mut primitive = json!({
            "attributes": attributes,
            "indices": indices,
        });

        let handle = mesh.material_slots.get(slot).copied().flatten();
        if let Some(handle) = handle {
            let index = *material_indices.entry(handle).or_insert_with(|| {
                let material = materials.material(handle);
                let mut pbr = json!({
                    "metallicFactor": 0.0,
                    "roughnessFactor": 1.0,
                });
                if let Some(texture) = material.texture {
                    let next = textures.len();
                    let index = *textures.entry(texture).or_insert(next);
                    pbr["baseColorTexture"] = json!({ "index": index });
                }
                gltf_materials.push(json!({
                    "name": material.name,
                    "pbrMetallicRoughness": pbr,
                }));
                gltf_materials.len() - 1
            });
            primitive["material"] = json!(index);
        }

        primitives.push(primitive);
    }

    let mut images = vec![];
    for &texture in textures.keys() {
        let texture = materials.texture(texture);
        let name = texture
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        images.push(json!({
            "name": name,
            "bufferView": bin.push(&texture.png, 0),
            "mimeType": "image/png",
        }));
    }

    let mut node = json!({ "name": mesh.name });
    let mut root = json!({
        "asset": {
            "version": "2.0",
            "generator": GENERATOR,
        },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
    });

    if !primitives.is_empty() {
        node["mesh"] = json!(0);
        root["meshes"] = json!([{
            "name": mesh.name,
            "primitives": primitives,
        }]);
        root["accessors"] = json!(accessors);
    }
    root["nodes"] = json!([node]);
    if !gltf_materials.is_empty() {
        root["materials"] = json!(gltf_materials);
    }
    if !images.is_empty() {
        let textures: Vec<Value> = (0..images.len())
            .map(|i| json!({ "sampler": 0, "source": i }))
            .collect();
        root["images"] = json!(images);
        root["textures"] = json!(textures);
        root["samplers"] = json!([{}]);
    }
    if !bin.data.is_empty() {
        root["bufferViews"] = json!(bin.views);
        root["buffers"] = json!([{ "byteLength": bin.data.len() }]);
    }

    let json = serde_json::to_vec(&root)
        .res(|| "failed to serialize glTF document".to_string())?;
    Ok(assemble(json, bin.data))
}

/// Unwelded per-corner attributes of a group of faces, with polygons
/// fanned into triangles.
struct Corners {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Option<Vec<f32>>,
    indices: Vec<u32>,
}

impl Corners {
    fn collect(mesh: &Mesh, faces: &[FaceIdx]) -> Corners {
        let mut corners = Corners {
            positions: vec![],
            normals: vec![],
            uvs: mesh.uv_layer.as_ref().map(|_| vec![]),
            indices: vec![],
        };

        for &f in faces {
            let normal = mesh
                .world_normal(f)
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            let first = (corners.positions.len() / 3) as u32;
            let vertices = &mesh.faces[f].vertices;

            for (corner, &v) in vertices.iter().enumerate() {
                let p = mesh.world_vertex(v);
                corners.positions.extend(p.iter().map(|&c| c as f32));
                corners.normals.extend(normal.iter().map(|&c| c as f32));
                if let Some(uvs) = corners.uvs.as_mut() {
                    let uv = mesh.uv(f, corner).unwrap_or_else(Vector2::zeros);
                    // glTF puts the texture origin at the top left.
                    uvs.extend([uv.x as f32, (1.0 - uv.y) as f32]);
                }
            }

            for i in 1..vertices.len() as u32 - 1 {
                corners.indices.extend([first, first + i, first + i + 1]);
            }
        }

        corners
    }
}

#[derive(Default)]
struct BinBuilder {
    data: Vec<u8>,
    views: Vec<Value>,
}

impl BinBuilder {
    /// Appends a 4-byte aligned buffer view. A zero target leaves the
    /// view untargeted.
    fn push(&mut self, bytes: &[u8], target: u32) -> usize {
        let mut view = json!({
            "buffer": 0,
            "byteOffset": self.data.len(),
            "byteLength": bytes.len(),
        });
        if target != 0 {
            view["target"] = json!(target);
        }
        self.data.extend_from_slice(bytes);
        pad(&mut self.data, 0);
        self.views.push(view);
        self.views.len() - 1
    }
}

fn bounds(positions: &[f32]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for p in positions.chunks(3) {
        for k in 0..3 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }
    (min, max)
}

fn assemble(mut json: Vec<u8>, mut bin: Vec<u8>) -> Vec<u8> {
    pad(&mut json, b' ');
    pad(&mut bin, 0);

    let mut len = 12 + 8 + json.len();
    if !bin.is_empty() {
        len += 8 + bin.len();
    }

    let mut glb = Vec::with_capacity(len);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&(len as u32).to_le_bytes());

    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json);

    if !bin.is_empty() {
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
        glb.extend_from_slice(&bin);
    }

    glb
}

fn pad(data: &mut Vec<u8>, filler: u8) {
    while data.len() % 4 != 0 {
        data.push(filler);
    }
}

fn floats_to_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn u32s_to_bytes(data: &[u32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}
