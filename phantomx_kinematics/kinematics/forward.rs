//! Forward kinematics

use super::{homogeneous_origin, to_point, transform};
use crate::error::{AngleFault, KinematicsError, KinematicsResult};
use crate::geometry::LegGeometry;
use crate::messages::JointAngles;
use nalgebra::{Matrix4, Point3, Vector4};

/// Joint positions of a leg in the body frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegPose {
    pub shoulder: Point3<f64>,
    pub thigh: Point3<f64>,
    pub tibia: Point3<f64>,
    pub tip: Point3<f64>,
}

/// Shoulder frame to thigh frame, including the shoulder rotation
pub(crate) fn shoulder_to_thigh(geometry: &LegGeometry, angles: &JointAngles) -> Matrix4<f64> {
    transform::shoulder_rotation(angles.alpha)
        * transform::thigh_transform(angles.beta, geometry.links().coxa)
}

/// Foot tip in the shoulder frame
pub fn local_tip_position(geometry: &LegGeometry, angles: &JointAngles) -> Vector4<f64> {
    let links = geometry.links();
    shoulder_to_thigh(geometry, angles)
        * transform::tibia_transform(angles.gamma, links.thigh)
        * transform::tip_transform(links.tip)
        * homogeneous_origin()
}

/// Shoulder angle that places the leg plane through a point in the shoulder frame
pub fn shoulder_angle_of(local: &Vector4<f64>) -> f64 {
    -local.z.atan2(-local.y)
}

/// Foot tip position in the body frame
///
/// The shoulder angle is re-derived from the resulting tip; a disagreement
/// larger than the alpha tolerance means the tip folded behind the shoulder
/// axis and the triple is rejected. No joint range check happens here.
pub fn forward_kinematics(
    geometry: &LegGeometry,
    angles: &JointAngles,
) -> KinematicsResult<Point3<f64>> {
    let local = local_tip_position(geometry, angles);
    let computed = shoulder_angle_of(&local);

    if !computed.is_finite() || (computed - angles.alpha).abs() >= geometry.tolerances().alpha_check
    {
        return Err(KinematicsError::InvalidAngle {
            leg: geometry.name(),
            angles: *angles,
            fault: AngleFault::InconsistentShoulder { computed },
        });
    }

    Ok(to_point(&(geometry.static_body_transform() * local)))
}

/// Positions of every joint and the tip in the body frame
pub fn joint_positions(geometry: &LegGeometry, angles: &JointAngles) -> LegPose {
    let links = geometry.links();
    let body = geometry.static_body_transform();
    let thigh_frame = body * shoulder_to_thigh(geometry, angles);
    let tibia_frame = thigh_frame * transform::tibia_transform(angles.gamma, links.thigh);
    let tip_frame = tibia_frame * transform::tip_transform(links.tip);

    LegPose {
        shoulder: to_point(&(body * homogeneous_origin())),
        thigh: to_point(&(thigh_frame * homogeneous_origin())),
        tibia: to_point(&(tibia_frame * homogeneous_origin())),
        tip: to_point(&(tip_frame * homogeneous_origin())),
    }
}
