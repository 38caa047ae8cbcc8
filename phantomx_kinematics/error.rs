//! Error types for the kinematics core

use crate::geometry::LegName;
use crate::messages::JointAngles;
use nalgebra::Point3;
use std::fmt;
use thiserror::Error;

/// Why a set of joint angles was rejected by forward kinematics
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleFault {
    /// At least one angle lies outside its joint interval
    OutOfRange,
    /// The shoulder angle re-derived from the resulting position disagrees with the input
    InconsistentShoulder { computed: f64 },
}

impl fmt::Display for AngleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleFault::OutOfRange => write!(f, "outside the joint ranges"),
            AngleFault::InconsistentShoulder { computed } => {
                write!(f, "shoulder angle re-derived as {:.4}", computed)
            }
        }
    }
}

/// Kinematics errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    #[error("Joint values for leg {leg} have not been received yet")]
    NotReady { leg: LegName },

    #[error(
        "The provided angles for {leg} ({}, {}, {}) are not valid for the forward/inverse kinematics: {fault}",
        .angles.alpha, .angles.beta, .angles.gamma
    )]
    InvalidAngle {
        leg: LegName,
        angles: JointAngles,
        fault: AngleFault,
    },

    #[error(
        "The provided position ({}, {}, {}) is not valid for the given geometry for leg {leg}",
        .target.x, .target.y, .target.z
    )]
    UnreachableTarget { leg: LegName, target: Point3<f64> },

    #[error("Invalid geometry for leg {leg}: {reason}")]
    InvalidGeometry { leg: LegName, reason: String },
}

impl KinematicsError {
    /// The leg the error refers to
    pub fn leg(&self) -> LegName {
        match self {
            KinematicsError::NotReady { leg }
            | KinematicsError::InvalidAngle { leg, .. }
            | KinematicsError::UnreachableTarget { leg, .. }
            | KinematicsError::InvalidGeometry { leg, .. } => *leg,
        }
    }

    /// Whether retrying after more joint feedback can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, KinematicsError::NotReady { .. })
    }
}

/// Result type for kinematics operations
pub type KinematicsResult<T> = Result<T, KinematicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_message_reports_original_point() {
        let err = KinematicsError::UnreachableTarget {
            leg: LegName::RightMiddle,
            target: Point3::new(1.0, -2.5, 0.25),
        };
        assert_eq!(
            err.to_string(),
            "The provided position (1, -2.5, 0.25) is not valid for the given geometry for leg rm"
        );
        assert_eq!(err.leg(), LegName::RightMiddle);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_not_ready_is_recoverable() {
        let err = KinematicsError::NotReady {
            leg: LegName::LeftRear,
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("lr"));
    }

    #[test]
    fn test_invalid_angle_message() {
        let err = KinematicsError::InvalidAngle {
            leg: LegName::LeftFront,
            angles: JointAngles::new(0.7, 0.0, 0.0),
            fault: AngleFault::OutOfRange,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("The provided angles for lf (0.7, 0, 0)"));
        assert!(msg.ends_with("outside the joint ranges"));
    }
}
