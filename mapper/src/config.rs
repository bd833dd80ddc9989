use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use base::defs::{Error, ErrorKind::*, Result};
use base::util::fs;

use crate::criteria::*;
use crate::mesh::MAX_MATERIAL_SLOTS;

pub const DEFAULT_CAMERA_NAME: &str = "Camera";
pub const DEFAULT_LOCATION: [f64; 3] = [0.0, 0.0, 10.0];
pub const DEFAULT_SELECTION_EPSILON: f64 = 1.5;
pub const DEFAULT_SENSOR_WIDTH: f64 = 36.0;
pub const DEFAULT_SENSOR_HEIGHT: f64 = 24.0;
pub const DEFAULT_FOCAL_LENGTH: f64 = 50.0;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    MaxCoord,
    MinCoord,
    Custom,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionParams {
    #[serde(rename = "type")]
    pub kind: SelectionType,
    pub coord: i64,
    pub epsilon: f64,
    pub normal_direction: i64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            kind: SelectionType::MaxCoord,
            coord: 2,
            epsilon: DEFAULT_SELECTION_EPSILON,
            normal_direction: 1,
        }
    }
}

/// One camera entry of the configuration file, as written by the user.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CameraConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_location")]
    pub location: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default)]
    pub selection_params: SelectionParams,
    #[serde(default)]
    pub material_index: usize,
    pub texture_path: PathBuf,

    #[serde(default = "default_projection")]
    pub projection: ProjectionType,
    #[serde(default = "default_sensor_width")]
    pub sensor_width: f64,
    #[serde(default = "default_sensor_height")]
    pub sensor_height: f64,
    #[serde(default = "default_focal_length")]
    pub focal_length: f64,
    #[serde(default = "default_ortho_uv_scale")]
    pub ortho_uv_scale: f64,
}

fn default_name() -> String {
    DEFAULT_CAMERA_NAME.to_string()
}

fn default_location() -> [f64; 3] {
    DEFAULT_LOCATION
}

fn default_projection() -> ProjectionType {
    ProjectionType::Perspective
}

fn default_sensor_width() -> f64 {
    DEFAULT_SENSOR_WIDTH
}

fn default_sensor_height() -> f64 {
    DEFAULT_SENSOR_HEIGHT
}

fn default_focal_length() -> f64 {
    DEFAULT_FOCAL_LENGTH
}

fn default_ortho_uv_scale() -> f64 {
    DEFAULT_ORTHO_UV_SCALE
}

impl CameraConfig {
    pub fn to_mapping(&self) -> Result<CameraMapping> {
        let projection = match self.projection {
            ProjectionType::Perspective => Projection::Perspective(
                Intrinsics::new(
                    self.sensor_width,
                    self.sensor_height,
                    self.focal_length,
                )
                .map_err(|e| self.config_error(&e.description))?,
            ),
            ProjectionType::Orthographic => {
                let uv_scale = self.ortho_uv_scale;
                if !(uv_scale > 0.0 && uv_scale.is_finite()) {
                    let desc = format!("bad orthographic scale {}", uv_scale);
                    return Err(self.config_error(&desc));
                }
                Projection::Orthographic { uv_scale }
            }
        };

        if self.material_index >= MAX_MATERIAL_SLOTS {
            let index = self.material_index;
            let desc = format!("material index {} is out of range", index);
            return Err(self.config_error(&desc));
        }

        Ok(CameraMapping {
            name: self.name.clone(),
            pose: CameraPose::from_euler(
                self.location,
                self.rotation,
                projection,
            ),
            criteria: self.criteria()?,
            material_slot: self.material_index,
            texture_path: self.texture_path.clone(),
        })
    }

    fn criteria(&self) -> Result<Option<SelectionCriteria>> {
        let params = &self.selection_params;

        let axis = usize::try_from(params.coord)
            .ok()
            .and_then(Axis::from_index)
            .ok_or_else(|| {
                let desc = format!("bad selection coord {}", params.coord);
                self.config_error(&desc)
            })?;

        let mode = match params.kind {
            SelectionType::MaxCoord => Extremum::MaxCoord,
            SelectionType::MinCoord => Extremum::MinCoord,
            SelectionType::Custom => return Ok(None),
        };

        SelectionCriteria::new(
            axis,
            mode,
            params.epsilon,
            NormalFilter::from_direction(params.normal_direction),
        )
        .map(Some)
        .map_err(|e| self.config_error(&e.description))
    }

    fn config_error(&self, desc: &str) -> Error {
        let desc = format!("camera '{}': {}", self.name, desc);
        Error::new(MalformedConfig, desc)
    }
}

/// Parses a JSON array of camera entries into camera mappings, keeping
/// the order in which they are configured.
pub fn parse_camera_mappings(json: &str) -> Result<Vec<CameraMapping>> {
    let configs: Vec<CameraConfig> =
        serde_json::from_str(json).map_err(|e| {
            let desc = "failed to parse camera configuration".to_string();
            Error::with_source(MalformedConfig, desc, e)
        })?;

    let mut names = HashSet::new();
    let mut mappings = Vec::with_capacity(configs.len());
    for config in &configs {
        if !names.insert(config.name.as_str()) {
            let desc = format!("duplicate camera name '{}'", config.name);
            return Err(Error::new(MalformedConfig, desc));
        }
        mappings.push(config.to_mapping()?);
    }

    Ok(mappings)
}

pub fn load_camera_mappings<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<CameraMapping>> {
    let json = fs::read_file_to_string(path)?;
    parse_camera_mappings(&json)
}
