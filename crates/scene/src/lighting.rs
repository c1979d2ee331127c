use glam::Vec3;
use landscape_gpu::LightRaw;
use serde::{Deserialize, Serialize};

/// Light type tag. Discriminants are shared with the fragment shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Unused = 0,
    /// Directional light; `position` is the direction towards the light.
    Sun = 1,
    Spot = 2,
    Point = 3,
    Ambient = 4,
}

/// One light descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub color: Vec3,
    pub specular_color: Vec3,
    pub intensity: f32,
    pub radius: f32,
    /// Constant, linear and quadratic falloff for point and spot lights.
    pub attenuation: Vec3,
    /// Spot cone half-angle in radians.
    pub cone_angle: f32,
    pub cone_direction: Vec3,
    pub cone_attenuation: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Sun,
            position: Vec3::ZERO,
            color: Vec3::ONE,
            specular_color: Vec3::splat(0.6),
            intensity: 1.0,
            radius: 0.0,
            attenuation: Vec3::new(1.0, 0.0, 0.0),
            cone_angle: 0.0,
            cone_direction: Vec3::ZERO,
            cone_attenuation: 0.0,
        }
    }
}

impl Light {
    pub fn sun(direction: Vec3) -> Self {
        Self {
            position: direction,
            ..Self::default()
        }
    }

    pub fn ambient(color: Vec3) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            ..Self::default()
        }
    }

    pub fn point(position: Vec3, color: Vec3, attenuation: Vec3) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            color,
            attenuation,
            ..Self::default()
        }
    }

    pub fn spot(position: Vec3, direction: Vec3, cone_angle: f32, color: Vec3) -> Self {
        Self {
            kind: LightKind::Spot,
            position,
            color,
            cone_angle,
            cone_direction: direction,
            cone_attenuation: 8.0,
            attenuation: Vec3::new(1.0, 0.5, 0.0),
            ..Self::default()
        }
    }

    pub fn to_raw(&self) -> LightRaw {
        LightRaw {
            position: self.position.to_array(),
            kind: self.kind as u32,
            color: self.color.to_array(),
            intensity: self.intensity,
            specular_color: self.specular_color.to_array(),
            radius: self.radius,
            attenuation: self.attenuation.to_array(),
            cone_angle: self.cone_angle,
            cone_direction: self.cone_direction.to_array(),
            cone_attenuation: self.cone_attenuation,
        }
    }
}

/// Ordered light list. Read every frame by the renderer, never written by it.
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    lights: Vec<Light>,
}

impl Lighting {
    pub fn new(lights: Vec<Light>) -> Self {
        Self { lights }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// GPU snapshot of the current list.
    pub fn to_raw(&self) -> Vec<LightRaw> {
        self.lights.iter().map(Light::to_raw).collect()
    }
}

impl Default for Lighting {
    /// A sun above and behind the origin plus a dim ambient fill.
    fn default() -> Self {
        Self::new(vec![
            Light::sun(Vec3::new(1.0, 2.0, -2.0)),
            Light::ambient(Vec3::splat(0.1)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lighting_has_sun_and_ambient() {
        let lighting = Lighting::default();
        let kinds: Vec<LightKind> = lighting.lights().iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LightKind::Sun, LightKind::Ambient]);
    }

    #[test]
    fn raw_light_carries_kind_tag() {
        let raw = Light::point(Vec3::ONE, Vec3::X, Vec3::new(1.0, 0.1, 0.01)).to_raw();
        assert_eq!(raw.kind, 3);
        assert_eq!(raw.position, [1.0, 1.0, 1.0]);
        assert_eq!(raw.attenuation, [1.0, 0.1, 0.01]);
    }

    #[test]
    fn raw_snapshot_preserves_order() {
        let lighting = Lighting::new(vec![
            Light::ambient(Vec3::splat(0.2)),
            Light::spot(Vec3::Y, -Vec3::Y, 0.4, Vec3::ONE),
        ]);
        let raw = lighting.to_raw();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].kind, LightKind::Ambient as u32);
        assert_eq!(raw[1].kind, LightKind::Spot as u32);
        assert_eq!(raw[1].cone_direction, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn light_deserializes_with_defaults() {
        let light: Light = serde_json::from_str(r#"{"kind": "point", "position": [0, 3, 0]}"#).unwrap();
        assert_eq!(light.kind, LightKind::Point);
        assert_eq!(light.position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(light.color, Vec3::ONE);
    }
}
