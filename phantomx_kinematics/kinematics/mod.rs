//! Leg kinematics
//!
//! - [`transform`]: homogeneous joint transforms
//! - [`forward`]: joint angles to foot position
//! - [`inverse`]: analytic foot position to joint angles
//!
//! All functions here are pure. Joint state and locking live in [`crate::leg`].

pub mod forward;
pub mod inverse;
pub mod transform;

pub use forward::{forward_kinematics, joint_positions, local_tip_position, LegPose};
pub use inverse::{inverse_kinematics, law_of_cosines, ClampEdge};

use nalgebra::{Point3, Vector4};

pub(crate) fn homogeneous_origin() -> Vector4<f64> {
    Vector4::new(0.0, 0.0, 0.0, 1.0)
}

pub(crate) fn to_point(v: &Vector4<f64>) -> Point3<f64> {
    Point3::new(v.x, v.y, v.z)
}
