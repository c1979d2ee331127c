use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PhysicsError {
    #[error("body {code}: mass must be positive and finite, got {mass}")]
    InvalidMass { code: u32, mass: f32 },
    #[error("body {code}: shape size must be non-negative")]
    InvalidShape { code: u32 },
    #[error("duplicate body code {0}")]
    DuplicateCode(u32),
}

/// Collision shape, centred on the body's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyShape {
    Sphere { radius: f32 },
    /// Axis-aligned cube.
    Cube { side_length: f32 },
}

impl BodyShape {
    pub fn volume(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3),
            Self::Cube { side_length } => side_length.powi(3),
        }
    }

    /// True when the shape has no extent and cannot touch anything.
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Self::Sphere { radius } => radius <= 0.0,
            Self::Cube { side_length } => side_length <= 0.0,
        }
    }
}

/// A point mass with a collision shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RigidBody {
    code: u32,
    mass: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    shape: BodyShape,
}

impl RigidBody {
    pub fn new(
        code: u32,
        mass: f32,
        position: Vec3,
        velocity: Vec3,
        shape: BodyShape,
    ) -> Result<Self, PhysicsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass { code, mass });
        }
        let size = match shape {
            BodyShape::Sphere { radius } => radius,
            BodyShape::Cube { side_length } => side_length,
        };
        if !(size >= 0.0) {
            return Err(PhysicsError::InvalidShape { code });
        }
        Ok(Self {
            code,
            mass,
            position,
            velocity,
            shape,
        })
    }

    pub fn sphere(code: u32, mass: f32, position: Vec3, velocity: Vec3, radius: f32) -> Result<Self, PhysicsError> {
        Self::new(code, mass, position, velocity, BodyShape::Sphere { radius })
    }

    pub fn cube(code: u32, mass: f32, position: Vec3, velocity: Vec3, side_length: f32) -> Result<Self, PhysicsError> {
        Self::new(code, mass, position, velocity, BodyShape::Cube { side_length })
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }

    pub fn shape(&self) -> &BodyShape {
        &self.shape
    }

    pub fn momentum(&self) -> Vec3 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Advance the position by `velocity * dt`.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_mass() {
        assert_eq!(
            RigidBody::sphere(7, 0.0, Vec3::ZERO, Vec3::ZERO, 1.0).unwrap_err(),
            PhysicsError::InvalidMass { code: 7, mass: 0.0 }
        );
        assert!(RigidBody::sphere(1, f32::NAN, Vec3::ZERO, Vec3::ZERO, 1.0).is_err());
        assert!(RigidBody::cube(1, 1.0, Vec3::ZERO, Vec3::ZERO, -1.0).is_err());
    }

    #[test]
    fn integrate_moves_along_velocity() {
        let mut body = RigidBody::sphere(1, 2.0, Vec3::ZERO, Vec3::new(1.0, 0.0, -2.0), 0.5).unwrap();
        body.integrate(0.5);
        assert_eq!(body.position, Vec3::new(0.5, 0.0, -1.0));
        assert_eq!(body.momentum(), Vec3::new(2.0, 0.0, -4.0));
    }

    #[test]
    fn volumes() {
        assert_eq!(BodyShape::Cube { side_length: 2.0 }.volume(), 8.0);
        let sphere = BodyShape::Sphere { radius: 1.0 }.volume();
        assert!((sphere - 4.18879).abs() < 1e-4);
    }

    #[test]
    fn shape_serializes_tagged() {
        let json = serde_json::to_string(&BodyShape::Cube { side_length: 1.5 }).unwrap();
        assert_eq!(json, r#"{"kind":"cube","side_length":1.5}"#);
    }
}
