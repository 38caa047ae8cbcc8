//! Homogeneous joint transforms
//!
//! Every joint transform has the same shape: a rotation about the local X
//! axis by the joint angle, preceded by a fixed rotation about Y and a
//! fixed translation. The leg extends along -Y in every joint frame.

use nalgebra::{Matrix3, Matrix4};
use std::f64::consts::{FRAC_PI_2, PI};

/// Fixed rotation about Y between the shoulder and thigh frames
const THIGH_MOUNT_ANGLE: f64 = FRAC_PI_2;
/// Fixed rotation about Y between the thigh and tibia frames
const TIBIA_MOUNT_ANGLE: f64 = PI;

/// `Translation(offset) * RotY(fixed) * RotX(angle)`
#[rustfmt::skip]
fn joint_transform(angle: f64, fixed: f64, offset: [f64; 3]) -> Matrix4<f64> {
    let (s, c) = angle.sin_cos();
    let (sf, cf) = fixed.sin_cos();
    Matrix4::new(
        cf, s * sf, c * sf, offset[0],
        0.0, c, -s, offset[1],
        -sf, s * cf, c * cf, offset[2],
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Shoulder rotation about X by `alpha`
pub fn shoulder_rotation(alpha: f64) -> Matrix4<f64> {
    joint_transform(alpha, 0.0, [0.0; 3])
}

/// Shoulder frame to thigh frame
pub fn thigh_transform(beta: f64, coxa: f64) -> Matrix4<f64> {
    joint_transform(beta, THIGH_MOUNT_ANGLE, [0.0, -coxa, 0.0])
}

/// Thigh frame to tibia frame
pub fn tibia_transform(gamma: f64, thigh_offset: [f64; 2]) -> Matrix4<f64> {
    joint_transform(
        gamma,
        TIBIA_MOUNT_ANGLE,
        [0.0, thigh_offset[0], thigh_offset[1]],
    )
}

/// Tibia frame to foot tip
pub fn tip_transform(tip_offset: [f64; 2]) -> Matrix4<f64> {
    Matrix4::new_translation(&nalgebra::Vector3::new(0.0, tip_offset[0], tip_offset[1]))
}

/// Shoulder frame in the body frame for a mount position and outward heading
///
/// Local X maps to body +Z, the leg axis (local -Y) points along the heading.
#[rustfmt::skip]
pub fn mount_transform(position: [f64; 3], heading: f64) -> Matrix4<f64> {
    let (dy, dx) = heading.sin_cos();
    Matrix4::new(
        0.0, -dx, dy, position[0],
        0.0, -dy, -dx, position[1],
        1.0, 0.0, 0.0, position[2],
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Inverse of a rigid transform: `[R^T | -R^T t]`
pub fn rigid_inverse(m: &Matrix4<f64>) -> Matrix4<f64> {
    let rotation_t = m.fixed_view::<3, 3>(0, 0).transpose();
    let translation = -(rotation_t * m.fixed_view::<3, 1>(0, 3));
    let mut inverse = Matrix4::identity();
    inverse.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation_t);
    inverse.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
    inverse
}

/// Orthonormal rotation block with determinant +1, finite translation and a `[0 0 0 1]` last row
pub fn is_rigid(m: &Matrix4<f64>, tolerance: f64) -> bool {
    if m.iter().any(|v| !v.is_finite()) {
        return false;
    }
    let bottom_ok = m[(3, 0)].abs() < tolerance
        && m[(3, 1)].abs() < tolerance
        && m[(3, 2)].abs() < tolerance
        && (m[(3, 3)] - 1.0).abs() < tolerance;
    let rotation: Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();
    let orthonormal = (rotation.transpose() * rotation - Matrix3::identity()).norm() < tolerance;
    bottom_ok && orthonormal && (rotation.determinant() - 1.0).abs() < tolerance
}
