use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use log::Level;

use crate::criteria::{Axis, Extremum};

/// Progress and outcome notifications of one mapping run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    RunStarted {
        mesh_path: PathBuf,
        cameras: usize,
    },
    MeshImported {
        name: String,
        vertices: usize,
        faces: usize,
        dropped_faces: usize,
    },
    UvLayerCreated {
        name: String,
    },
    CameraStarted {
        camera: String,
    },
    ExtremumFound {
        camera: String,
        axis: Axis,
        mode: Extremum,
        value: f64,
    },
    FacesSelected {
        camera: String,
        faces: usize,
    },
    SelectionEmpty {
        camera: String,
    },
    SelectionUnsupported {
        camera: String,
    },
    UvsProjected {
        camera: String,
        corners: usize,
        behind_camera: usize,
    },
    MaterialCreated {
        camera: String,
        material: String,
        slot: usize,
    },
    MaterialReused {
        camera: String,
        material: String,
        slot: usize,
    },
    TextureLoaded {
        path: PathBuf,
        width: u32,
        height: u32,
        cached: bool,
    },
    TextureFailed {
        camera: String,
        reason: String,
    },
    CameraFinished {
        camera: String,
        faces: usize,
        textured: bool,
    },
    Exporting {
        path: PathBuf,
    },
    RunFinished,
}

impl RunEvent {
    pub fn level(&self) -> Level {
        use RunEvent::*;
        match self {
            ExtremumFound { .. } | UvsProjected { .. } => Level::Debug,
            SelectionEmpty { .. } | SelectionUnsupported { .. } => {
                Level::Warn
            }
            TextureFailed { .. } => Level::Error,
            _ => Level::Info,
        }
    }
}

impl Display for RunEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        use RunEvent::*;
        match self {
            RunStarted { mesh_path, cameras } => write!(
                f,
                "processing mesh '{}' with {} camera(s)",
                mesh_path.display(),
                cameras
            ),
            MeshImported {
                name,
                vertices,
                faces,
                dropped_faces,
            } => {
                write!(
                    f,
                    "imported mesh '{}' ({} vertices, {} faces)",
                    name, vertices, faces
                )?;
                if *dropped_faces > 0 {
                    let n = dropped_faces;
                    write!(f, ", dropped {} degenerate face(s)", n)?;
                }
                Ok(())
            }
            UvLayerCreated { name } => {
                write!(f, "created UV layer '{}'", name)
            }
            CameraStarted { camera } => {
                write!(f, "processing camera '{}'", camera)
            }
            ExtremumFound {
                camera,
                axis,
                mode,
                value,
            } => write!(
                f,
                "camera '{}': {} {} coordinate is {}",
                camera, mode, axis, value
            ),
            FacesSelected { camera, faces } => {
                write!(f, "camera '{}': selected {} face(s)", camera, faces)
            }
            SelectionEmpty { camera } => {
                write!(f, "camera '{}' selected no faces, skipped", camera)
            }
            SelectionUnsupported { camera } => write!(
                f,
                "camera '{}' uses custom selection which is not \
                 implemented, skipped",
                camera
            ),
            UvsProjected {
                camera,
                corners,
                behind_camera,
            } => write!(
                f,
                "camera '{}': projected {} corner(s), {} behind camera",
                camera, corners, behind_camera
            ),
            MaterialCreated {
                camera,
                material,
                slot,
            } => write!(
                f,
                "camera '{}': created material '{}' in slot {}",
                camera, material, slot
            ),
            MaterialReused {
                camera,
                material,
                slot,
            } => write!(
                f,
                "camera '{}': reused slot {} material as '{}'",
                camera, slot, material
            ),
            TextureLoaded {
                path,
                width,
                height,
                cached,
            } => {
                let how = if *cached { "reused" } else { "loaded" };
                write!(
                    f,
                    "{} {}x{} texture '{}'",
                    how,
                    width,
                    height,
                    path.display()
                )
            }
            TextureFailed { camera, reason } => write!(
                f,
                "camera '{}' left untextured: {}",
                camera, reason
            ),
            CameraFinished {
                camera,
                faces,
                textured,
            } => write!(
                f,
                "camera '{}' done: {} face(s), {}",
                camera,
                faces,
                if *textured { "textured" } else { "untextured" }
            ),
            Exporting { path } => {
                write!(f, "exporting to '{}'", path.display())
            }
            RunFinished => write!(f, "processing finished"),
        }
    }
}

pub trait RunObserver {
    fn on_event(&mut self, event: RunEvent);
}

/// Forwards events to the `log` facade.
#[derive(Default)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn on_event(&mut self, event: RunEvent) {
        log::log!(event.level(), "{}", event);
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub events: Vec<RunEvent>,
}

impl RecordingObserver {
    pub fn count(&self, pred: impl Fn(&RunEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl RunObserver for RecordingObserver {
    fn on_event(&mut self, event: RunEvent) {
        self.events.push(event);
    }
}
