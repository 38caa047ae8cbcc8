//! Node driving one leg from feedback and foot targets

use super::{Node, NodeError, NodeResult};
use crate::communication::Subscriber;
use crate::error::KinematicsError;
use crate::geometry::JointId;
use crate::leg::LegKinematics;
use crate::messages::{timestamp_now, FootTarget, JointFeedback, LogSummary};
use crate::tf::TFTree;
use parking_lot::RwLock;
use std::sync::Arc;

/// Glue between a [`LegKinematics`] and its topics
///
/// Each tick drains all queued joint feedback into the leg, executes the
/// newest queued foot target through inverse kinematics and, when a frame
/// tree is attached, publishes the leg frames.
pub struct LegNode {
    name: String,
    leg: Arc<LegKinematics>,
    feedback: Vec<(JointId, Box<dyn Subscriber<JointFeedback>>)>,
    targets: Option<Box<dyn Subscriber<FootTarget>>>,
    tf_tree: Option<Arc<RwLock<TFTree>>>,
    initialized: bool,
    ticks: u64,
    commands_sent: u64,
    last_error: Option<KinematicsError>,
}

impl LegNode {
    pub fn new(leg: Arc<LegKinematics>) -> Self {
        Self {
            name: format!("leg_{}", leg.name()),
            leg,
            feedback: Vec::new(),
            targets: None,
            tf_tree: None,
            initialized: false,
            ticks: 0,
            commands_sent: 0,
            last_error: None,
        }
    }

    pub fn with_feedback(
        mut self,
        joint: JointId,
        subscriber: Box<dyn Subscriber<JointFeedback>>,
    ) -> Self {
        self.feedback.push((joint, subscriber));
        self
    }

    pub fn with_targets(mut self, subscriber: Box<dyn Subscriber<FootTarget>>) -> Self {
        self.targets = Some(subscriber);
        self
    }

    pub fn with_tf_tree(mut self, tree: Arc<RwLock<TFTree>>) -> Self {
        self.tf_tree = Some(tree);
        self
    }

    pub fn leg(&self) -> &Arc<LegKinematics> {
        &self.leg
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    /// Error of the most recent foot target that could not be executed
    pub fn last_error(&self) -> Option<&KinematicsError> {
        self.last_error.as_ref()
    }

    fn drain_feedback(&self) {
        for (joint, subscriber) in &self.feedback {
            while let Some(feedback) = subscriber.recv() {
                self.leg.update_joint(*joint, &feedback);
            }
        }
    }

    fn newest_target(&self) -> Option<FootTarget> {
        let targets = self.targets.as_ref()?;
        std::iter::from_fn(|| targets.recv()).last()
    }

    fn execute(&mut self, target: FootTarget) {
        match self.leg.compute_inverse_kinematics(Some(target.position())) {
            Ok(angles) => {
                self.leg.set_command(angles);
                self.commands_sent += 1;
                self.last_error = None;
            }
            Err(e) => {
                log::warn!("{}: target {} dropped: {}", self.name, target.log_summary(), e);
                self.last_error = Some(e);
            }
        }
    }

    fn publish_frames(&self) {
        let Some(tree) = &self.tf_tree else {
            return;
        };
        if let Err(e) = self.leg.publish_frames(&mut tree.write(), timestamp_now()) {
            log::warn!("{}: frame publish failed: {}", self.name, e);
        }
    }
}

impl Node for LegNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) -> NodeResult<()> {
        let joints: Vec<JointId> = self.feedback.iter().map(|(joint, _)| *joint).collect();
        for joint in JointId::ALL {
            if !joints.contains(&joint) {
                log::warn!("{}: no feedback subscriber for {:?}", self.name, joint);
            }
        }
        self.initialized = true;
        log::info!(
            "{}: initialized with {} feedback topics",
            self.name,
            self.feedback.len()
        );
        Ok(())
    }

    fn tick(&mut self) {
        if !self.initialized {
            let error = NodeError::NotInitialized(self.name.clone());
            self.on_error(&error.to_string());
            return;
        }

        self.drain_feedback();
        if let Some(target) = self.newest_target() {
            self.execute(target);
        }
        self.publish_frames();
        self.ticks += 1;
    }

    fn shutdown(&mut self) -> NodeResult<()> {
        log::info!(
            "{}: shut down after {} ticks, {} commands sent",
            self.name,
            self.ticks,
            self.commands_sent
        );
        self.initialized = false;
        Ok(())
    }

    fn get_publishers(&self) -> Vec<String> {
        JointId::ALL
            .iter()
            .map(|joint| joint.actuator_name(self.leg.name()))
            .collect()
    }

    fn get_subscribers(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .feedback
            .iter()
            .map(|(_, s)| s.topic().to_string())
            .collect();
        if let Some(targets) = &self.targets {
            topics.push(targets.topic().to_string());
        }
        topics
    }
}
