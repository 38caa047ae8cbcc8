//! Kinematics of a single leg with live joint state
//!
//! [`LegKinematics`] combines the immutable [`LegGeometry`] with the latest
//! controller feedback. It is shared between the feedback path and the
//! control loop, so the joint state sits behind one lock and every query
//! works on a copied snapshot.

mod contact;
mod state;

pub use contact::ContactReference;
pub use state::JointState;

use crate::communication::Publisher;
use crate::error::{AngleFault, KinematicsError, KinematicsResult};
use crate::geometry::{phantomx, JointId, LegGeometry, LegName};
use crate::kinematics::{self, LegPose};
use crate::messages::{JointAngles, JointFeedback, LegCommand, LogSummary};
use crate::tf::{LegFrames, TFResult, TFTree};
use nalgebra::Point3;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

pub struct LegKinematics {
    geometry: LegGeometry,
    contact: ContactReference,
    tracking_threshold: f64,
    state: RwLock<JointState>,
    frames: LegFrames,
    command_sink: Option<Arc<dyn Publisher<LegCommand>>>,
}

impl fmt::Debug for LegKinematics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegKinematics")
            .field("leg", &self.geometry.name())
            .field("state", &*self.state.read())
            .field("has_command_sink", &self.command_sink.is_some())
            .finish()
    }
}

impl LegKinematics {
    /// Leg with the PhantomX contact reference of its group and default tracking threshold
    pub fn new(geometry: LegGeometry) -> Self {
        let leg = geometry.name();
        Self {
            contact: ContactReference::for_group(leg.group()),
            tracking_threshold: phantomx::TRACKING_THRESHOLD,
            state: RwLock::new(JointState::default()),
            frames: LegFrames::new(leg),
            command_sink: None,
            geometry,
        }
    }

    pub fn with_contact_reference(mut self, contact: ContactReference) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_tracking_threshold(mut self, threshold: f64) -> Self {
        self.tracking_threshold = threshold;
        self
    }

    /// Attach the publisher that receives commands from [`set_command`](Self::set_command)
    pub fn with_command_sink(mut self, sink: Arc<dyn Publisher<LegCommand>>) -> Self {
        self.command_sink = Some(sink);
        self
    }

    pub fn name(&self) -> LegName {
        self.geometry.name()
    }

    pub fn geometry(&self) -> &LegGeometry {
        &self.geometry
    }

    pub fn contact_reference(&self) -> &ContactReference {
        &self.contact
    }

    pub fn frames(&self) -> &LegFrames {
        &self.frames
    }

    /// Apply controller feedback for one joint
    pub fn update_joint(&self, joint: JointId, feedback: &JointFeedback) {
        log::trace!(
            "leg {} {:?}: {}",
            self.name(),
            joint,
            feedback.log_summary()
        );
        self.state
            .write()
            .apply(joint, feedback, self.tracking_threshold);
    }

    /// Apply feedback for several joints in one write
    pub fn update_joints<'a>(&self, updates: impl IntoIterator<Item = (JointId, &'a JointFeedback)>) {
        let mut state = self.state.write();
        for (joint, feedback) in updates {
            state.apply(joint, feedback, self.tracking_threshold);
        }
    }

    /// Copy of the joint state
    pub fn snapshot(&self) -> JointState {
        *self.state.read()
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot().is_ready()
    }

    pub fn target_reached(&self) -> bool {
        self.snapshot().target_reached()
    }

    pub fn get_current_angles(&self) -> Option<JointAngles> {
        self.snapshot().current_angles()
    }

    pub fn get_current_targets(&self) -> Option<JointAngles> {
        self.snapshot().current_targets()
    }

    fn current_or_not_ready(&self) -> KinematicsResult<JointAngles> {
        self.get_current_angles().ok_or(KinematicsError::NotReady { leg: self.name() })
    }

    /// Supplied angles (range checked) or the current snapshot
    fn resolve_angles(&self, angles: Option<JointAngles>) -> KinematicsResult<JointAngles> {
        match angles {
            Some(angles) => {
                if !self.geometry.limits().contains(&angles) {
                    return Err(KinematicsError::InvalidAngle {
                        leg: self.name(),
                        angles,
                        fault: AngleFault::OutOfRange,
                    });
                }
                Ok(angles)
            }
            None => self.current_or_not_ready(),
        }
    }

    /// Foot tip in the body frame
    ///
    /// Without `angles` the current joint state is used; supplied angles must
    /// lie within the joint limits.
    pub fn compute_forward_kinematics(
        &self,
        angles: Option<JointAngles>,
    ) -> KinematicsResult<Point3<f64>> {
        let angles = self.resolve_angles(angles)?;
        kinematics::forward_kinematics(&self.geometry, &angles)
    }

    /// Foot tip in the shoulder frame, without the shoulder consistency check
    pub fn forward_kinematics_local(
        &self,
        angles: Option<JointAngles>,
    ) -> KinematicsResult<Point3<f64>> {
        let angles = self.resolve_angles(angles)?;
        let local = kinematics::local_tip_position(&self.geometry, &angles);
        Ok(Point3::new(local.x, local.y, local.z))
    }

    pub fn joint_positions(&self, angles: Option<JointAngles>) -> KinematicsResult<LegPose> {
        let angles = self.resolve_angles(angles)?;
        Ok(kinematics::joint_positions(&self.geometry, &angles))
    }

    /// Current foot tip in the body frame
    pub fn end_effector_position(&self) -> KinematicsResult<Point3<f64>> {
        self.compute_forward_kinematics(None)
    }

    /// Joint angles for a foot target, or for the current foot position
    pub fn compute_inverse_kinematics(
        &self,
        target: Option<Point3<f64>>,
    ) -> KinematicsResult<JointAngles> {
        let target = match target {
            Some(target) => target,
            None => self.end_effector_position()?,
        };
        kinematics::inverse_kinematics(&self.geometry, &target)
    }

    /// Whether the current foot position suggests ground contact
    pub fn predicted_ground_contact(&self) -> bool {
        let ee = match self.end_effector_position() {
            Ok(ee) => ee,
            Err(e) => {
                log::debug!("leg {}: no ground contact prediction: {}", self.name(), e);
                return false;
            }
        };

        let contact = self
            .contact
            .predicts_contact(&ee, self.geometry.movement_dir());
        if contact {
            log::debug!(
                "leg {} ({}) predicts ground contact at ({:.4}, {:.4}, {:.4})",
                self.name(),
                self.name().group().as_str(),
                ee.x,
                ee.y,
                ee.z
            );
        }
        contact
    }

    /// Send joint targets to the command sink
    pub fn set_command(&self, angles: JointAngles) {
        let current = self
            .get_current_angles()
            .map(|a| a.log_summary())
            .unwrap_or_else(|| "unknown".to_string());
        log::info!(
            "leg {}: command {} (current {})",
            self.name(),
            angles.log_summary(),
            current
        );

        let Some(sink) = &self.command_sink else {
            log::warn!("leg {}: no command sink attached, command dropped", self.name());
            return;
        };
        if let Err(e) = sink.send(LegCommand::new(self.name(), angles)) {
            log::warn!("leg {}: command rejected by '{}': {}", self.name(), sink.topic(), e);
        }
    }

    /// Publish the current pose into a frame tree; false when not ready
    pub fn publish_frames(&self, tree: &mut TFTree, timestamp: u64) -> TFResult<bool> {
        let Some(angles) = self.get_current_angles() else {
            return Ok(false);
        };
        self.frames
            .publish(tree, &self.geometry, &angles, timestamp)?;
        Ok(true)
    }

    /// Foot tip by named-frame lookup of `MP_BODY` to `tip_<leg>`
    pub fn compute_forward_kinematics_tf(
        &self,
        tree: &TFTree,
        timestamp: u64,
    ) -> TFResult<Point3<f64>> {
        self.frames.tip_position(tree, timestamp)
    }
}
