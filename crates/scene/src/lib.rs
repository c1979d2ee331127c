//! Scene model: cameras, lights and drawable objects.
//!
//! # Invariants
//! - The scene exclusively owns its camera, lighting and objects.
//! - Camera matrices are derived on demand, never stored.
//! - Objects are drawn in container order.

pub mod camera;
pub mod config;
mod error;
pub mod lighting;
pub mod object;
pub mod scene;

pub use camera::{ArcballCamera, Camera, FirstPersonCamera};
pub use config::{
    ArcballConfig, CameraConfig, FirstPersonConfig, ObjectConfig, SceneConfig, ShapeConfig,
};
pub use error::SceneError;
pub use lighting::{Light, LightKind, Lighting};
pub use object::{SceneObject, Shape};
pub use scene::Scene;
