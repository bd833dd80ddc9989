use std::path::Path;

use base::defs::Error;

use crate::material::{MaterialHandle, Materials, TextureHandle};
use crate::mesh::Mesh;
use crate::misc::*;
use crate::project::UvAssignment;

#[derive(Debug, Default)]
pub struct BindResult {
    pub faces: usize,
    pub material: Option<MaterialHandle>,
    pub material_created: bool,
    pub texture: Option<TextureHandle>,
    pub texture_cached: bool,
    pub texture_error: Option<Error>,
}

/// Writes one camera's region onto the mesh: the faces move to the
/// material slot, whose material gets the texture, and the projected
/// coordinates replace the UVs of the touched corners. Whatever an
/// earlier camera wrote for the same faces is overwritten.
///
/// A texture that fails to load leaves the material blank; the faces
/// still get their slot and coordinates.
pub fn bind_region(
    mesh: &mut Mesh,
    materials: &mut Materials,
    faces: &[FaceIdx],
    uvs: &UvAssignment,
    slot: usize,
    material_name: &str,
    texture_path: &Path,
) -> BindResult {
    if faces.is_empty() {
        return BindResult::default();
    }

    mesh.ensure_material_slot(slot);
    let (material, material_created) = match mesh.material_slots[slot] {
        Some(material) => {
            materials.rename_material(material, material_name);
            (material, false)
        }
        None => {
            let material = materials.create_material(material_name);
            mesh.material_slots[slot] = Some(material);
            (material, true)
        }
    };

    // The material is rebuilt from scratch for every binding.
    materials.bind_texture(material, None);

    let mut res = BindResult {
        faces: faces.len(),
        material: Some(material),
        material_created,
        ..Default::default()
    };

    match materials.load_texture(texture_path) {
        Ok((texture, cached)) => {
            materials.bind_texture(material, Some(texture));
            res.texture = Some(texture);
            res.texture_cached = cached;
        }
        Err(err) => res.texture_error = Some(err),
    }

    mesh.assign_material_slot(faces, slot);
    for (&(f, corner), &uv) in &uvs.uvs {
        mesh.set_uv(f, corner, uv);
    }

    res
}
