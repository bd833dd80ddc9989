use std::path::PathBuf;

use derive_more::Display;

use base::defs::{Error, ErrorKind::*, Result};

use crate::misc::*;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_index(index: usize) -> Option<Axis> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which end of the axis the selected region hugs. New selection modes
/// are added here as variants.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Extremum {
    #[display(fmt = "maximum")]
    MaxCoord,
    #[display(fmt = "minimum")]
    MinCoord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalFilter {
    Positive,
    Negative,
    Ignore,
}

impl NormalFilter {
    /// Maps a signed direction flag (1, -1 or 0) onto a filter.
    pub fn from_direction(direction: i64) -> NormalFilter {
        match direction.signum() {
            1 => NormalFilter::Positive,
            -1 => NormalFilter::Negative,
            _ => NormalFilter::Ignore,
        }
    }

    pub fn accepts(self, component: f64) -> bool {
        match self {
            NormalFilter::Positive => component > 0.0,
            NormalFilter::Negative => component < 0.0,
            NormalFilter::Ignore => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionCriteria {
    pub axis: Axis,
    pub mode: Extremum,
    pub tolerance: f64,
    pub normal_filter: NormalFilter,
}

impl SelectionCriteria {
    pub fn new(
        axis: Axis,
        mode: Extremum,
        tolerance: f64,
        normal_filter: NormalFilter,
    ) -> Result<SelectionCriteria> {
        if !(tolerance >= 0.0 && tolerance.is_finite()) {
            let desc = format!("bad selection tolerance {}", tolerance);
            return Err(Error::new(MalformedConfig, desc));
        }
        Ok(SelectionCriteria {
            axis,
            mode,
            tolerance,
            normal_filter,
        })
    }

    /// Whether a world coordinate lies within tolerance of the extremum.
    pub fn accepts_coord(&self, coord: f64, extremum: f64) -> bool {
        match self.mode {
            Extremum::MaxCoord => coord >= extremum - self.tolerance,
            Extremum::MinCoord => coord <= extremum + self.tolerance,
        }
    }
}

/// Pinhole camera intrinsics in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intrinsics {
    pub sensor_width: f64,
    pub sensor_height: f64,
    pub focal_length: f64,
}

impl Intrinsics {
    pub fn new(
        sensor_width: f64,
        sensor_height: f64,
        focal_length: f64,
    ) -> Result<Intrinsics> {
        let positive = |v: f64| v > 0.0 && v.is_finite();
        if !positive(sensor_width)
            || !positive(sensor_height)
            || !positive(focal_length)
        {
            let desc = format!(
                "bad camera intrinsics (sensor {}x{}, focal length {})",
                sensor_width, sensor_height, focal_length
            );
            return Err(Error::new(MalformedConfig, desc));
        }
        Ok(Intrinsics {
            sensor_width,
            sensor_height,
            focal_length,
        })
    }

    /// Horizontal field of view in radians.
    pub fn fov(&self) -> f64 {
        2.0 * (self.sensor_width / (2.0 * self.focal_length)).atan()
    }

    pub fn aspect(&self) -> f64 {
        self.sensor_width / self.sensor_height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective(Intrinsics),
    // World units spanning the whole UV range, centered on the camera
    // axis: u = 0.5 + x / uv_scale.
    Orthographic { uv_scale: f64 },
}

pub const DEFAULT_ORTHO_UV_SCALE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Point3,
    pub orientation: Quaternion,
    pub projection: Projection,
}

impl CameraPose {
    /// Poses a camera from a location and XYZ Euler angles (radians),
    /// the camera looking down its local -Z axis.
    pub fn from_euler(
        location: [f64; 3],
        rotation: [f64; 3],
        projection: Projection,
    ) -> CameraPose {
        let [rx, ry, rz] = rotation;
        CameraPose {
            position: Point3::from(location),
            orientation: Quaternion::from_euler_angles(rx, ry, rz),
            projection,
        }
    }

    pub fn camera_to_world(&self) -> Isometry3 {
        Isometry3::from_parts(self.position.coords.into(), self.orientation)
    }

    pub fn world_to_camera(&self) -> Isometry3 {
        self.camera_to_world().inverse()
    }
}

/// One configured camera: where it stands, which faces it claims and
/// which texture it paints onto them.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraMapping {
    pub name: String,
    pub pose: CameraPose,
    // None when the configured selection type has no implementation.
    pub criteria: Option<SelectionCriteria>,
    pub material_slot: usize,
    pub texture_path: PathBuf,
}
