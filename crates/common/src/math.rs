//! Matrix builders shared by the camera models and scene objects.

use glam::{Mat3, Mat4, Vec3};

/// Rotation about X, then Y, then Z, composed as `Rx * Ry * Rz`.
pub fn rotation_xyz(angles: Vec3) -> Mat4 {
    Mat4::from_rotation_x(angles.x) * Mat4::from_rotation_y(angles.y) * Mat4::from_rotation_z(angles.z)
}

/// Yaw-pitch-roll order used by orbiting cameras, composed as `Ry * Rx * Rz`.
pub fn rotation_yxz(angles: Vec3) -> Mat4 {
    Mat4::from_rotation_y(angles.y) * Mat4::from_rotation_x(angles.x) * Mat4::from_rotation_z(angles.z)
}

/// `translation(position) * rotation_xyz(angles)`.
pub fn translation_rotation(position: Vec3, angles: Vec3) -> Mat4 {
    Mat4::from_translation(position) * rotation_xyz(angles)
}

/// Matrix for transforming normals: inverse-transpose of the upper-left 3x3.
///
/// Singular models (zero scale on some axis) have no inverse; the plain
/// upper-left 3x3 is returned for those.
pub fn normal_matrix(model: Mat4) -> Mat3 {
    let upper_left = Mat3::from_mat4(model);
    if upper_left.determinant().abs() <= f32::EPSILON {
        return upper_left;
    }
    upper_left.inverse().transpose()
}
