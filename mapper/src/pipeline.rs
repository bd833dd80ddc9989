use std::path::{Path, PathBuf};

use base::defs::{Error, ErrorKind::*, Result};
use base::util::fs;

use crate::bind::bind_region;
use crate::criteria::CameraMapping;
use crate::export_glb::export_glb;
use crate::import_ply::import_ply_file;
use crate::material::Materials;
use crate::mesh::{Mesh, DEFAULT_UV_MAP_NAME};
use crate::observer::{RunEvent, RunObserver};
use crate::project::project_faces;
use crate::select::select_faces;

pub const MATERIAL_NAME_PREFIX: &str = "Material_";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    EmptySelection,
    UnsupportedSelection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraOutcome {
    Textured { faces: usize },
    Untextured { faces: usize }, // Texture failed to load.
    Skipped(SkipReason),
}

pub struct RunReport {
    pub cameras: Vec<CameraOutcome>, // In configuration order.
    pub mesh: Mesh,
}

/// One mapping run: imports the mesh, lets every configured camera
/// claim and texture its region in order, then exports the result.
pub struct TextureMapper {
    input_mesh: PathBuf,
    cameras: Vec<CameraMapping>,
    output: PathBuf,
}

impl TextureMapper {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        input_mesh: P,
        cameras: Vec<CameraMapping>,
        output: Q,
    ) -> Self {
        Self {
            input_mesh: input_mesh.as_ref().to_path_buf(),
            cameras,
            output: output.as_ref().to_path_buf(),
        }
    }

    /// Checks that every input file is in place before anything is
    /// touched.
    pub fn validate(&self) -> Result<()> {
        if !fs::file_exists(&self.input_mesh) {
            let desc = format!(
                "input mesh '{}' does not exist",
                self.input_mesh.display()
            );
            return Err(Error::new(ValidationFailed, desc));
        }

        for camera in &self.cameras {
            if !fs::file_exists(&camera.texture_path) {
                let desc = format!(
                    "texture '{}' of camera '{}' does not exist",
                    camera.texture_path.display(),
                    camera.name
                );
                return Err(Error::new(ValidationFailed, desc));
            }
        }

        Ok(())
    }

    pub fn setup_scene(&self, observer: &mut dyn RunObserver) -> Result<Mesh> {
        let imported = import_ply_file(&self.input_mesh)?;
        let mut mesh = imported.mesh;
        observer.on_event(RunEvent::MeshImported {
            name: mesh.name.clone(),
            vertices: mesh.vertices.len(),
            faces: mesh.faces.len(),
            dropped_faces: imported.dropped_faces,
        });

        if mesh.vertices.is_empty() || mesh.faces.is_empty() {
            let desc =
                format!("no mesh found in '{}'", self.input_mesh.display());
            return Err(Error::new(SceneSetupFailed, desc));
        }

        if mesh.ensure_uv_layer(DEFAULT_UV_MAP_NAME) {
            observer.on_event(RunEvent::UvLayerCreated {
                name: DEFAULT_UV_MAP_NAME.to_string(),
            });
        }

        Ok(mesh)
    }

    /// Runs the cameras one after another on the shared mesh. A skipped
    /// or untextured camera does not stop the ones after it.
    pub fn apply_cameras(
        &self,
        mesh: &mut Mesh,
        materials: &mut Materials,
        observer: &mut dyn RunObserver,
    ) -> Result<Vec<CameraOutcome>> {
        let mut outcomes = Vec::with_capacity(self.cameras.len());
        for camera in &self.cameras {
            outcomes.push(process_camera(mesh, materials, camera, observer)?);
        }
        Ok(outcomes)
    }

    pub fn process(
        &self,
        observer: &mut dyn RunObserver,
    ) -> Result<RunReport> {
        observer.on_event(RunEvent::RunStarted {
            mesh_path: self.input_mesh.clone(),
            cameras: self.cameras.len(),
        });

        self.validate()?;
        let mut mesh = self.setup_scene(observer)?;

        let mut materials = Materials::default();
        let cameras =
            self.apply_cameras(&mut mesh, &mut materials, observer)?;

        observer.on_event(RunEvent::Exporting {
            path: self.output.clone(),
        });
        export_glb(&mesh, &materials, &self.output)?;

        observer.on_event(RunEvent::RunFinished);
        Ok(RunReport { cameras, mesh })
    }
}

/// Selects, projects and binds the region of one camera.
pub fn process_camera(
    mesh: &mut Mesh,
    materials: &mut Materials,
    camera: &CameraMapping,
    observer: &mut dyn RunObserver,
) -> Result<CameraOutcome> {
    let name = camera.name.clone();
    observer.on_event(RunEvent::CameraStarted {
        camera: name.clone(),
    });

    let criteria = match &camera.criteria {
        Some(criteria) => criteria,
        None => {
            observer.on_event(RunEvent::SelectionUnsupported { camera: name });
            return Ok(CameraOutcome::Skipped(
                SkipReason::UnsupportedSelection,
            ));
        }
    };

    let selection = select_faces(mesh, criteria)?;
    observer.on_event(RunEvent::ExtremumFound {
        camera: name.clone(),
        axis: criteria.axis,
        mode: criteria.mode,
        value: selection.extremum,
    });
    if selection.is_empty() {
        observer.on_event(RunEvent::SelectionEmpty { camera: name });
        return Ok(CameraOutcome::Skipped(SkipReason::EmptySelection));
    }
    observer.on_event(RunEvent::FacesSelected {
        camera: name.clone(),
        faces: selection.faces.len(),
    });

    let uvs = project_faces(mesh, &camera.pose, &selection.faces);
    observer.on_event(RunEvent::UvsProjected {
        camera: name.clone(),
        corners: uvs.len(),
        behind_camera: uvs.behind_camera,
    });

    let material_name = format!("{}{}", MATERIAL_NAME_PREFIX, camera.name);
    let res = bind_region(
        mesh,
        materials,
        &selection.faces,
        &uvs,
        camera.material_slot,
        &material_name,
        &camera.texture_path,
    );

    let event = if res.material_created {
        RunEvent::MaterialCreated {
            camera: name.clone(),
            material: material_name,
            slot: camera.material_slot,
        }
    } else {
        RunEvent::MaterialReused {
            camera: name.clone(),
            material: material_name,
            slot: camera.material_slot,
        }
    };
    observer.on_event(event);

    let textured = match res.texture {
        Some(handle) => {
            let texture = materials.texture(handle);
            observer.on_event(RunEvent::TextureLoaded {
                path: camera.texture_path.clone(),
                width: texture.width,
                height: texture.height,
                cached: res.texture_cached,
            });
            true
        }
        None => {
            let reason = res
                .texture_error
                .map(|e| e.to_string())
                .unwrap_or_default();
            observer.on_event(RunEvent::TextureFailed {
                camera: name.clone(),
                reason,
            });
            false
        }
    };

    observer.on_event(RunEvent::CameraFinished {
        camera: name,
        faces: res.faces,
        textured,
    });

    Ok(if textured {
        CameraOutcome::Textured { faces: res.faces }
    } else {
        CameraOutcome::Untextured { faces: res.faces }
    })
}
