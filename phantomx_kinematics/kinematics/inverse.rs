//! Analytic inverse kinematics
//!
//! The shoulder angle comes from the target direction in the shoulder frame.
//! Thigh and tibia angles come from the law of cosines on the triangles
//! shoulder/thigh joint/target and thigh joint/tibia joint/target.

use super::{homogeneous_origin, to_point, transform};
use crate::error::{KinematicsError, KinematicsResult};
use crate::geometry::LegGeometry;
use crate::messages::JointAngles;
use nalgebra::Point3;
use std::f64::consts::PI;

/// Which side of `[-1, 1]` a cosine ratio may overshoot and still be clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampEdge {
    /// Ratios slightly below -1 yield `PI`
    Lower,
    /// Ratios slightly above 1 yield `0`
    Upper,
}

/// `acos` of a law-of-cosines ratio
///
/// Returns `None` for non-finite ratios, for overshoot on the non-clamped
/// edge, and for overshoot larger than `tolerance` on the clamped edge.
pub fn law_of_cosines(cosine: f64, edge: ClampEdge, tolerance: f64) -> Option<f64> {
    if !cosine.is_finite() {
        return None;
    }
    match edge {
        ClampEdge::Lower if cosine < -1.0 => (cosine >= -1.0 - tolerance).then_some(PI),
        ClampEdge::Upper if cosine > 1.0 => (cosine <= 1.0 + tolerance).then_some(0.0),
        _ if cosine.abs() > 1.0 => None,
        _ => Some(cosine.acos()),
    }
}

/// Joint angles placing the foot tip at `target` (body frame)
///
/// The result is not checked against the joint ranges.
pub fn inverse_kinematics(
    geometry: &LegGeometry,
    target: &Point3<f64>,
) -> KinematicsResult<JointAngles> {
    let unreachable = || KinematicsError::UnreachableTarget {
        leg: geometry.name(),
        target: *target,
    };
    let tolerance = geometry.tolerances().cosine_clamp;
    let [l0, l1, l2] = geometry.segment_lengths();
    let body = geometry.static_body_transform();

    let local = geometry.body_to_shoulder() * target.to_homogeneous();
    let alpha = -local.z.atan2(-local.y);

    let thigh_joint = to_point(
        &(body
            * transform::shoulder_rotation(alpha)
            * transform::thigh_transform(0.0, geometry.links().coxa)
            * homogeneous_origin()),
    );
    let to_thigh = (target - thigh_joint).norm();
    let to_shoulder = (target - geometry.shoulder_position()).norm();

    let cos_gamma = (l2 * l2 + l1 * l1 - to_thigh * to_thigh) / (2.0 * l1 * l2);
    let knee = law_of_cosines(cos_gamma, ClampEdge::Lower, tolerance).ok_or_else(unreachable)?;

    let cos_thigh = (l1 * l1 + to_thigh * to_thigh - l2 * l2) / (2.0 * l1 * to_thigh);
    let h1 = law_of_cosines(cos_thigh, ClampEdge::Upper, tolerance).ok_or_else(unreachable)?;

    let cos_shoulder =
        (to_thigh * to_thigh + l0 * l0 - to_shoulder * to_shoulder) / (2.0 * to_thigh * l0);
    let h2 = law_of_cosines(cos_shoulder, ClampEdge::Lower, tolerance).ok_or_else(unreachable)?;

    let tz = geometry.tibia_z_offset_angle();
    let tt = geometry.thigh_tibia_angle();

    // z == 0 takes the below-body branch for gamma and the above-body branch for beta
    let gamma = if target.z > 0.0 {
        PI - knee - tz
    } else {
        knee - PI - tz
    };
    let beta = if target.z < 0.0 {
        PI - (h1 + h2 + tt)
    } else {
        h1 + h2 - PI - tt
    };

    Ok(JointAngles::new(alpha, beta, gamma))
}
