//! Rig configuration
//!
//! Everything that shapes the scene but never changes while it runs: segment
//! lengths, the startup pose, grab thresholds, where the prop rests and how it
//! sits in the hand, and the camera. Stored as RON; any missing section or
//! field falls back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::arm::{ArmPose, GrabRules, RigDimensions};
use crate::rasterizer::{Camera, Vec3};
use crate::placement::Placement;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where the prop comes from and how it is placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropConfig {
    /// Wavefront OBJ to load; the built-in stand-in is used when absent
    pub model_path: Option<PathBuf>,
    /// Resting pose on the ground at startup
    pub rest: Placement,
    /// Palm-local pose while held
    pub grasp_offset: Placement,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            rest: Placement::new(Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO, 0.08),
            grasp_offset: Placement::new(Vec3::new(0.04, 0.08, 0.0), Vec3::new(0.0, 90.0, 0.0), 0.08),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        // Slightly above the arm, pitched 15 degrees down
        Self {
            position: Vec3::new(0.0, 1.5, 2.5),
            target: Vec3::new(0.0, 0.83, 0.0),
            fov_degrees: 45.0,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera::look_at(self.position, self.target, self.fov_degrees)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    pub rig: RigDimensions,
    pub initial_pose: ArmPose,
    pub grab: GrabRules,
    pub prop: PropConfig,
    pub camera: CameraConfig,
}

impl ArmConfig {
    /// Read and validate a RON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&contents)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: ArmConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Reject values the rig cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rig = &self.rig;
        for (name, value) in [
            ("rig.shoulder_offset", rig.shoulder_offset),
            ("rig.elbow_offset", rig.elbow_offset),
            ("rig.wrist_offset", rig.wrist_offset),
            ("rig.palm_offset", rig.palm_offset),
            ("rig.finger_base_length", rig.finger_base_length),
            ("rig.finger_tip_length", rig.finger_tip_length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} must be a positive length, got {}", name, value)));
            }
        }
        if !(rig.finger_spacing.is_finite() && rig.finger_spacing >= 0.0) {
            return Err(invalid(format!("rig.finger_spacing must be >= 0, got {}", rig.finger_spacing)));
        }

        if !self.initial_pose.is_finite() {
            return Err(invalid("initial_pose contains a non-finite value".to_string()));
        }

        let grab = &self.grab;
        if !(grab.grab_radius.is_finite() && grab.grab_radius >= 0.0) {
            return Err(invalid(format!("grab.grab_radius must be >= 0, got {}", grab.grab_radius)));
        }
        if !grab.finger_base_threshold.is_finite() || !grab.finger_tip_threshold.is_finite() {
            return Err(invalid("grab thresholds must be finite".to_string()));
        }

        for (name, t) in [("prop.rest", &self.prop.rest), ("prop.grasp_offset", &self.prop.grasp_offset)] {
            if !t.is_finite() || t.scale <= 0.0 {
                return Err(invalid(format!("{} needs finite values and a positive scale", name)));
            }
        }

        let cam = &self.camera;
        if !cam.position.is_finite() || !cam.target.is_finite() {
            return Err(invalid("camera position and target must be finite".to_string()));
        }
        if cam.position == cam.target {
            return Err(invalid("camera position and target must differ".to_string()));
        }
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid(format!("camera.fov_degrees must be in (0, 180), got {}", cam.fov_degrees)));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
