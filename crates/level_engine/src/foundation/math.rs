//! Math utilities and types
//!
//! Thin aliases over `nalgebra` so the rest of the crate never names the
//! backing library directly.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Build a rotation from Euler angles in degrees (roll, pitch, yaw order)
pub fn quat_from_euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler_angles(
        angles.x.to_radians(),
        angles.y.to_radians(),
        angles.z.to_radians(),
    )
}

/// Compose a translation, Euler rotation (degrees) and scale into a TRS matrix
pub fn trs_matrix(position: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
    Mat4::new_translation(&position)
        * quat_from_euler_degrees(rotation_degrees).to_homogeneous()
        * Mat4::new_nonuniform_scaling(&scale)
}
