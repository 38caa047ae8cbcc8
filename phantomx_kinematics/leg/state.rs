//! Latest controller feedback for the three joints of a leg

use crate::geometry::JointId;
use crate::messages::{JointAngles, JointFeedback};

/// Process values, set points and reached flags per joint
///
/// A leg is ready once every joint has reported a process value. Before any
/// feedback arrives all joints count as reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointState {
    process_values: [Option<f64>; 3],
    set_points: [Option<f64>; 3],
    reached: [bool; 3],
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            process_values: [None; 3],
            set_points: [None; 3],
            reached: [true; 3],
        }
    }
}

fn slot(joint: JointId) -> usize {
    match joint {
        JointId::Alpha => 0,
        JointId::Beta => 1,
        JointId::Gamma => 2,
    }
}

impl JointState {
    /// Record feedback for one joint
    pub fn apply(&mut self, joint: JointId, feedback: &JointFeedback, threshold: f64) {
        let i = slot(joint);
        self.process_values[i] = Some(feedback.process_value);
        self.set_points[i] = Some(feedback.set_point);
        self.reached[i] = feedback.error.abs() < threshold;
    }

    pub fn is_ready(&self) -> bool {
        self.process_values.iter().all(Option::is_some)
    }

    /// All three joints within the tracking threshold
    pub fn target_reached(&self) -> bool {
        self.reached.iter().all(|r| *r)
    }

    pub fn joint_reached(&self, joint: JointId) -> bool {
        self.reached[slot(joint)]
    }

    pub fn process_value(&self, joint: JointId) -> Option<f64> {
        self.process_values[slot(joint)]
    }

    pub fn set_point(&self, joint: JointId) -> Option<f64> {
        self.set_points[slot(joint)]
    }

    /// Current angles, once every joint has reported
    pub fn current_angles(&self) -> Option<JointAngles> {
        match self.process_values {
            [Some(alpha), Some(beta), Some(gamma)] => Some(JointAngles::new(alpha, beta, gamma)),
            _ => None,
        }
    }

    /// Last commanded angles, once every joint has reported
    pub fn current_targets(&self) -> Option<JointAngles> {
        match self.set_points {
            [Some(alpha), Some(beta), Some(gamma)] => Some(JointAngles::new(alpha, beta, gamma)),
            _ => None,
        }
    }
}
