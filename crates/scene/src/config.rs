//! Scene descriptions loaded from YAML or JSON.
//!
//! ```yaml
//! camera:
//!   kind: arcball
//!   distance: 4.0
//! lights:
//!   - kind: sun
//!     position: [1.0, 2.0, -2.0]
//! objects:
//!   - name: ball
//!     shape: { kind: sphere, radius: 0.5 }
//!     position: [0.0, 0.0, 5.0]
//! ```

use std::path::Path;

use glam::{Mat4, Vec3};
use landscape_common::math::rotation_xyz;
use landscape_gpu::{MAX_SPHERE_DIVISIONS, RenderDevice};
use serde::{Deserialize, Serialize};

use crate::camera::{ArcballCamera, Camera, FirstPersonCamera};
use crate::error::SceneError;
use crate::lighting::{Light, Lighting};
use crate::object::{SceneObject, Shape};
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstPersonConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub rotation_degrees: Vec3,
}

impl Default for FirstPersonConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcballConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub target: Vec3,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub pitch_degrees: f32,
    pub yaw_degrees: f32,
}

impl Default for ArcballConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            near: 0.1,
            far: 100.0,
            target: Vec3::ZERO,
            distance: 2.5,
            min_distance: 0.0,
            max_distance: 20.0,
            pitch_degrees: 0.0,
            yaw_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraConfig {
    FirstPerson(FirstPersonConfig),
    Arcball(ArcballConfig),
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::FirstPerson(FirstPersonConfig::default())
    }
}

fn check_projection(fov_degrees: f32, near: f32, far: f32) -> Result<(), SceneError> {
    if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
        return Err(SceneError::InvalidCamera(format!(
            "fov must be in (0, 180) degrees, got {fov_degrees}"
        )));
    }
    if !(near > 0.0 && near < far) {
        return Err(SceneError::InvalidCamera(format!(
            "need 0 < near < far, got near {near} far {far}"
        )));
    }
    Ok(())
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        match self {
            Self::FirstPerson(c) => check_projection(c.fov_degrees, c.near, c.far),
            Self::Arcball(c) => {
                check_projection(c.fov_degrees, c.near, c.far)?;
                if !(c.min_distance <= c.distance && c.distance <= c.max_distance) {
                    return Err(SceneError::InvalidCamera(format!(
                        "arcball distance {} outside [{}, {}]",
                        c.distance, c.min_distance, c.max_distance
                    )));
                }
                Ok(())
            }
        }
    }

    /// Camera with aspect 1; the first resize sets the real one.
    pub fn to_camera(&self) -> Camera {
        match self {
            Self::FirstPerson(c) => FirstPersonCamera {
                aspect: 1.0,
                fov: c.fov_degrees.to_radians(),
                near: c.near,
                far: c.far,
                position: c.position,
                rotation: Vec3::new(
                    c.rotation_degrees.x.to_radians(),
                    c.rotation_degrees.y.to_radians(),
                    c.rotation_degrees.z.to_radians(),
                ),
            }
            .into(),
            Self::Arcball(c) => {
                let mut camera = ArcballCamera {
                    aspect: 1.0,
                    fov: c.fov_degrees.to_radians(),
                    near: c.near,
                    far: c.far,
                    min_distance: c.min_distance,
                    max_distance: c.max_distance,
                    target: c.target,
                    distance: c.distance,
                    position: c.target,
                    rotation: Vec3::new(c.pitch_degrees.to_radians(), c.yaw_degrees.to_radians(), 0.0),
                };
                camera.update_position();
                camera.into()
            }
        }
    }
}

fn default_segments() -> u32 {
    64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Sphere {
        radius: f32,
        #[serde(default)]
        center: Vec3,
        #[serde(default = "default_segments")]
        segments: u32,
        #[serde(default = "default_segments")]
        rings: u32,
    },
}

impl ShapeConfig {
    pub fn to_shape(&self) -> Shape {
        match *self {
            Self::Sphere {
                radius,
                center,
                segments,
                rings,
            } => Shape::Sphere {
                radius,
                center,
                segments,
                rings,
            },
        }
    }
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    pub shape: ShapeConfig,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation_degrees: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

impl ObjectConfig {
    /// `translation * rotation * scale`.
    pub fn placement(&self) -> Mat4 {
        let radians = Vec3::new(
            self.rotation_degrees.x.to_radians(),
            self.rotation_degrees.y.to_radians(),
            self.rotation_degrees.z.to_radians(),
        );
        Mat4::from_translation(self.position) * rotation_xyz(radians) * Mat4::from_scale(self.scale)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let invalid = |reason: String| SceneError::InvalidObject {
            name: self.name.clone(),
            reason,
        };
        match self.shape {
            ShapeConfig::Sphere {
                radius,
                segments,
                rings,
                ..
            } => {
                if !(radius > 0.0) {
                    return Err(invalid(format!("radius must be positive, got {radius}")));
                }
                if segments < 3 {
                    return Err(invalid(format!("need at least 3 segments, got {segments}")));
                }
                if rings < 2 {
                    return Err(invalid(format!("need at least 2 rings, got {rings}")));
                }
                if segments > MAX_SPHERE_DIVISIONS || rings > MAX_SPHERE_DIVISIONS {
                    return Err(invalid(format!(
                        "at most {MAX_SPHERE_DIVISIONS} segments and rings, got {segments}x{rings}"
                    )));
                }
            }
        }
        if self.scale.cmpeq(Vec3::ZERO).any() {
            return Err(invalid("scale has a zero component".into()));
        }
        Ok(())
    }
}

/// Camera, lights and objects of one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub lights: Vec<Light>,
    pub objects: Vec<ObjectConfig>,
}

impl Default for SceneConfig {
    /// One half-unit sphere five units in front of a camera at the origin.
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            lights: Lighting::default().lights().to_vec(),
            objects: vec![ObjectConfig {
                name: "Sphere_1".into(),
                shape: ShapeConfig::Sphere {
                    radius: 0.5,
                    center: Vec3::ZERO,
                    segments: 64,
                    rings: 64,
                },
                position: Vec3::new(0.0, 0.0, 5.0),
                rotation_degrees: Vec3::ZERO,
                scale: Vec3::ONE,
            }],
        }
    }
}

impl SceneConfig {
    /// Load and validate a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(SceneError::UnsupportedFormat(other.to_string())),
        };
        tracing::info!(
            "loaded scene {} with {} objects and {} lights",
            path.display(),
            config.objects.len(),
            config.lights.len()
        );
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, SceneError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, SceneError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        self.camera.validate()?;
        for object in &self.objects {
            object.validate()?;
        }
        Ok(())
    }

    /// Validate, then tessellate and upload every object through `device`.
    pub fn build<D: RenderDevice>(&self, device: &D) -> Result<Scene<D::Buffer>, SceneError> {
        self.validate()?;
        let mut scene = Scene::new(self.camera.to_camera(), Lighting::new(self.lights.clone()));
        for object in &self.objects {
            scene.push_object(SceneObject::new(
                device,
                object.name.clone(),
                object.shape.to_shape(),
                object.placement(),
            )?);
        }
        Ok(scene)
    }
}
