//! Control messages for a single leg

use super::{timestamp_now, LogSummary};
use crate::geometry::{JointId, LegName};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Shoulder, thigh and tibia angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl JointAngles {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    pub fn get(&self, joint: JointId) -> f64 {
        match joint {
            JointId::Alpha => self.alpha,
            JointId::Beta => self.beta,
            JointId::Gamma => self.gamma,
        }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.alpha, self.beta, self.gamma]
    }

    pub fn is_finite(&self) -> bool {
        self.alpha.is_finite() && self.beta.is_finite() && self.gamma.is_finite()
    }

    /// Largest per-joint absolute difference
    pub fn max_abs_diff(&self, other: &JointAngles) -> f64 {
        (self.alpha - other.alpha)
            .abs()
            .max((self.beta - other.beta).abs())
            .max((self.gamma - other.gamma).abs())
    }
}

impl From<[f64; 3]> for JointAngles {
    fn from([alpha, beta, gamma]: [f64; 3]) -> Self {
        Self::new(alpha, beta, gamma)
    }
}

/// Controller state of one joint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointFeedback {
    /// Measured joint angle (rad)
    pub process_value: f64,
    /// Commanded joint angle (rad)
    pub set_point: f64,
    /// Tracking error reported by the controller (rad)
    pub error: f64,
    /// Nanoseconds since epoch
    pub timestamp: u64,
}

impl JointFeedback {
    pub fn new(process_value: f64, set_point: f64, error: f64) -> Self {
        Self {
            process_value,
            set_point,
            error,
            timestamp: timestamp_now(),
        }
    }

    /// Feedback for a joint sitting exactly on its set point
    pub fn settled(angle: f64) -> Self {
        Self::new(angle, angle, 0.0)
    }
}

/// Position command for the three joints of a leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegCommand {
    pub leg: LegName,
    pub angles: JointAngles,
    /// Nanoseconds since epoch
    pub timestamp: u64,
}

impl LegCommand {
    pub fn new(leg: LegName, angles: JointAngles) -> Self {
        Self {
            leg,
            angles,
            timestamp: timestamp_now(),
        }
    }

    /// `(actuator name, angle)` per joint, e.g. `("j_c1_lf", 0.1)`
    pub fn joint_commands(&self) -> [(String, f64); 3] {
        JointId::ALL.map(|joint| (joint.actuator_name(self.leg), self.angles.get(joint)))
    }
}

/// Desired foot position in the body frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootTarget {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Nanoseconds since epoch
    pub timestamp: u64,
}

impl FootTarget {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            timestamp: timestamp_now(),
        }
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl From<Point3<f64>> for FootTarget {
    fn from(p: Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl LogSummary for JointAngles {
    fn log_summary(&self) -> String {
        format!(
            "alpha={:.4} beta={:.4} gamma={:.4}",
            self.alpha, self.beta, self.gamma
        )
    }
}

impl LogSummary for JointFeedback {
    fn log_summary(&self) -> String {
        format!(
            "pv={:.4} sp={:.4} err={:.4}",
            self.process_value, self.set_point, self.error
        )
    }
}

impl LogSummary for LegCommand {
    fn log_summary(&self) -> String {
        format!("{} {}", self.leg, self.angles.log_summary())
    }
}

impl LogSummary for FootTarget {
    fn log_summary(&self) -> String {
        format!("({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_commands_use_actuator_names() {
        let cmd = LegCommand::new(LegName::LeftFront, JointAngles::new(0.1, -0.2, 0.3));
        let joints = cmd.joint_commands();
        assert_eq!(joints[0], ("j_c1_lf".to_string(), 0.1));
        assert_eq!(joints[1], ("j_thigh_lf".to_string(), -0.2));
        assert_eq!(joints[2], ("j_tibia_lf".to_string(), 0.3));
        assert!(cmd.timestamp > 0);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = JointAngles::new(0.1, 0.2, 0.3);
        let b = JointAngles::new(0.1, 0.25, 0.2);
        assert!((a.max_abs_diff(&b) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_leg_command_serializes_short_leg_name() {
        let cmd = LegCommand {
            leg: LegName::RightMiddle,
            angles: JointAngles::new(0.0, 0.1, -0.1),
            timestamp: 42,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"leg\":\"rm\""));
        let back: LegCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn test_log_summary() {
        let fb = JointFeedback {
            process_value: 0.5,
            set_point: 0.25,
            error: 0.25,
            timestamp: 0,
        };
        assert_eq!(fb.log_summary(), "pv=0.5000 sp=0.2500 err=0.2500");
    }
}
