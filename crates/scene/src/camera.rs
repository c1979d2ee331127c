use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3, Vec4};
use landscape_common::ViewportSize;
use landscape_common::math::{rotation_yxz, translation_rotation};

/// Free camera placed by position and Euler orientation.
///
/// World transform is `translation(position) * rotation(rotation)`; the view
/// matrix is its inverse. Orientation is only changed from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonCamera {
    pub aspect: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            fov: 70.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl FirstPersonCamera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn world_transform(&self) -> Mat4 {
        translation_rotation(self.position, self.rotation)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_transform().inverse()
    }

    /// Recompute the aspect ratio. `size.height` must be non-zero.
    pub fn resize(&mut self, size: ViewportSize) {
        self.aspect = size.aspect();
    }
}

/// Camera orbiting `target` at `distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcballCamera {
    pub aspect: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub target: Vec3,
    pub distance: f32,
    pub position: Vec3,
    /// Pitch in `x`, yaw in `y`, radians.
    pub rotation: Vec3,
}

impl Default for ArcballCamera {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            fov: 70.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
            min_distance: 0.0,
            max_distance: 20.0,
            target: Vec3::ZERO,
            distance: 2.5,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl ArcballCamera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov, self.aspect, self.near, self.far)
    }

    /// Look-at view of the target, or the inverse of
    /// `translation(target) * rotation_yxz(rotation)` when the eye sits on
    /// the target and a look-at direction does not exist.
    ///
    /// The check is exact float equality on the current position and target.
    /// Positions that drift to within rounding of the target skip the
    /// degenerate branch and take the look-at branch with a numerically
    /// unstable view direction.
    pub fn view_matrix(&self) -> Mat4 {
        if self.target == self.position {
            (Mat4::from_translation(self.target) * rotation_yxz(self.rotation)).inverse()
        } else {
            Mat4::look_at_lh(self.position, self.target, Vec3::Y)
        }
    }

    pub fn resize(&mut self, size: ViewportSize) {
        self.aspect = size.aspect();
    }

    /// Set the orbit distance, clamped to `[min_distance, max_distance]`.
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self.update_position();
    }

    /// Rotate around the target. Pitch is clamped to a quarter turn either way.
    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.rotation.y += yaw_delta;
        self.rotation.x = (self.rotation.x + pitch_delta).clamp(-FRAC_PI_2, FRAC_PI_2);
        self.update_position();
    }

    /// Place the eye `distance` behind the target along the current orientation.
    pub fn update_position(&mut self) {
        let rotate = rotation_yxz(Vec3::new(-self.rotation.x, self.rotation.y, 0.0));
        let offset = rotate * Vec4::new(0.0, 0.0, -self.distance, 0.0);
        self.position = self.target + offset.truncate();
    }
}

/// Either camera model, as held by a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Camera {
    FirstPerson(FirstPersonCamera),
    Arcball(ArcballCamera),
}

impl Camera {
    pub fn projection_matrix(&self) -> Mat4 {
        match self {
            Self::FirstPerson(c) => c.projection_matrix(),
            Self::Arcball(c) => c.projection_matrix(),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        match self {
            Self::FirstPerson(c) => c.view_matrix(),
            Self::Arcball(c) => c.view_matrix(),
        }
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        match self {
            Self::FirstPerson(c) => c.position,
            Self::Arcball(c) => c.position,
        }
    }

    pub fn aspect(&self) -> f32 {
        match self {
            Self::FirstPerson(c) => c.aspect,
            Self::Arcball(c) => c.aspect,
        }
    }

    pub fn resize(&mut self, size: ViewportSize) {
        match self {
            Self::FirstPerson(c) => c.resize(size),
            Self::Arcball(c) => c.resize(size),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::FirstPerson(FirstPersonCamera::default())
    }
}

impl From<FirstPersonCamera> for Camera {
    fn from(camera: FirstPersonCamera) -> Self {
        Self::FirstPerson(camera)
    }
}

impl From<ArcballCamera> for Camera {
    fn from(camera: ArcballCamera) -> Self {
        Self::Arcball(camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn is_finite(m: Mat4) -> bool {
        m.to_cols_array().iter().all(|v| v.is_finite())
    }

    #[test]
    fn projection_matches_reference_matrix() {
        let cam = FirstPersonCamera::default();
        let proj = cam.projection_matrix();

        let y = 1.0 / 35.0_f32.to_radians().tan();
        let z = 100.0 / (100.0 - 0.1);
        let expected = Mat4::from_cols(
            Vec4::new(y, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, z, 1.0),
            Vec4::new(0.0, 0.0, -0.1 * z, 0.0),
        );
        assert!(proj.abs_diff_eq(expected, EPS));
        assert!(is_finite(proj));
    }

    #[test]
    fn projection_maps_near_to_zero_and_far_to_one() {
        let samples = [
            (70.0_f32, 0.1_f32, 100.0_f32, 1.0_f32),
            (45.0, 0.5, 50.0, 16.0 / 9.0),
            (90.0, 0.01, 1000.0, 0.5),
        ];
        for (fov, near, far, aspect) in samples {
            let cam = FirstPersonCamera {
                fov: fov.to_radians(),
                near,
                far,
                aspect,
                ..FirstPersonCamera::default()
            };
            let proj = cam.projection_matrix();
            assert!(is_finite(proj));
            let near_depth = proj.project_point3(Vec3::new(0.0, 0.0, near)).z;
            let far_depth = proj.project_point3(Vec3::new(0.0, 0.0, far)).z;
            assert!(near_depth.abs() < 1e-4, "near depth {near_depth}");
            assert!((far_depth - 1.0).abs() < 1e-4, "far depth {far_depth}");
        }
    }

    #[test]
    fn first_person_view_inverts_world_transform() {
        let samples = [
            (Vec3::ZERO, Vec3::ZERO),
            (Vec3::new(1.0, -2.0, 3.0), Vec3::new(0.3, -0.5, 0.1)),
            (Vec3::new(-10.0, 4.0, 0.5), Vec3::new(1.2, 2.8, -0.7)),
        ];
        for (position, rotation) in samples {
            let cam = FirstPersonCamera {
                position,
                rotation,
                ..FirstPersonCamera::default()
            };
            let world = Mat4::from_translation(position)
                * Mat4::from_rotation_x(rotation.x)
                * Mat4::from_rotation_y(rotation.y)
                * Mat4::from_rotation_z(rotation.z);
            assert!((cam.view_matrix() * world).abs_diff_eq(Mat4::IDENTITY, 1e-4));
        }
    }

    #[test]
    fn arcball_on_target_uses_translation_rotation_inverse() {
        let cam = ArcballCamera {
            target: Vec3::new(1.0, 2.0, 3.0),
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.2, 0.4, 0.0),
            ..ArcballCamera::default()
        };
        let expected = (Mat4::from_translation(cam.target) * rotation_yxz(cam.rotation)).inverse();
        assert_eq!(cam.view_matrix(), expected);
        assert!(is_finite(cam.view_matrix()));
    }

    #[test]
    fn arcball_zero_distance_collapses_onto_target() {
        let mut cam = ArcballCamera {
            target: Vec3::new(0.0, 1.0, 0.0),
            rotation: Vec3::new(0.3, 1.1, 0.0),
            ..ArcballCamera::default()
        };
        cam.set_distance(0.0);
        assert_eq!(cam.distance, 0.0);
        assert_eq!(cam.position, cam.target);

        let expected = (Mat4::from_translation(cam.target) * rotation_yxz(cam.rotation)).inverse();
        assert_eq!(cam.view_matrix(), expected);
    }

    #[test]
    fn arcball_max_distance_uses_look_at() {
        let mut cam = ArcballCamera {
            rotation: Vec3::new(0.25, 0.5, 0.0),
            ..ArcballCamera::default()
        };
        cam.set_distance(1_000.0);
        assert_eq!(cam.distance, cam.max_distance);
        assert!(((cam.position - cam.target).length() - cam.max_distance).abs() < 1e-4);

        let view = cam.view_matrix();
        assert_eq!(view, Mat4::look_at_lh(cam.position, cam.target, Vec3::Y));
        // The target sits straight ahead at the orbit distance.
        let target_in_view = view.transform_point3(cam.target);
        assert!(target_in_view.abs_diff_eq(Vec3::new(0.0, 0.0, cam.max_distance), 1e-3));
    }

    #[test]
    fn arcball_default_orbit_sits_behind_target() {
        let mut cam = ArcballCamera::default();
        cam.update_position();
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), EPS));
    }

    #[test]
    fn arcball_pitch_is_clamped() {
        let mut cam = ArcballCamera::default();
        cam.orbit(0.0, 10.0);
        assert_eq!(cam.rotation.x, FRAC_PI_2);
        cam.orbit(0.0, -20.0);
        assert_eq!(cam.rotation.x, -FRAC_PI_2);
    }

    #[test]
    fn resize_sets_aspect_exactly() {
        let mut cam = FirstPersonCamera::default();
        cam.resize(ViewportSize::new(1920.0, 1080.0));
        assert_eq!(cam.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut cam = Camera::default();
        let size = ViewportSize::new(800.0, 600.0);
        cam.resize(size);
        let once = cam;
        cam.resize(size);
        assert_eq!(cam, once);
        assert_eq!(cam.projection_matrix(), once.projection_matrix());
    }

    #[test]
    fn projection_changes_iff_aspect_changes() {
        let mut cam = Camera::Arcball(ArcballCamera::default());
        cam.resize(ViewportSize::new(800.0, 600.0));
        let before = cam.projection_matrix();

        // Same ratio, different size.
        cam.resize(ViewportSize::new(400.0, 300.0));
        assert_eq!(cam.projection_matrix(), before);

        cam.resize(ViewportSize::new(600.0, 600.0));
        assert_ne!(cam.projection_matrix(), before);
    }

    #[test]
    fn camera_enum_forwards_position() {
        let cam: Camera = FirstPersonCamera {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..FirstPersonCamera::default()
        }
        .into();
        assert_eq!(cam.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
