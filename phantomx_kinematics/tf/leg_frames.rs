//! Named frames of one leg in a [`TFTree`]
//!
//! ```text
//! MP_BODY -> c1_<leg> -> thigh_<leg> -> tibia_<leg> -> tip_<leg>
//!   static    dynamic     dynamic        static
//! ```

use super::transform::Transform;
use super::tree::{TFResult, TFTree};
use super::BODY_FRAME;
use crate::geometry::{LegGeometry, LegName};
use crate::kinematics::transform as joint;
use crate::messages::JointAngles;
use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegFrames {
    leg: LegName,
    shoulder: String,
    thigh: String,
    tibia: String,
    tip: String,
}

impl LegFrames {
    pub fn new(leg: LegName) -> Self {
        Self {
            leg,
            shoulder: format!("c1_{}", leg),
            thigh: format!("thigh_{}", leg),
            tibia: format!("tibia_{}", leg),
            tip: format!("tip_{}", leg),
        }
    }

    pub fn leg(&self) -> LegName {
        self.leg
    }

    pub fn shoulder(&self) -> &str {
        &self.shoulder
    }

    pub fn thigh(&self) -> &str {
        &self.thigh
    }

    pub fn tibia(&self) -> &str {
        &self.tibia
    }

    pub fn tip(&self) -> &str {
        &self.tip
    }

    /// Record the leg pose at `timestamp`, adding the static frames on first use
    pub fn publish(
        &self,
        tree: &mut TFTree,
        geometry: &LegGeometry,
        angles: &JointAngles,
        timestamp: u64,
    ) -> TFResult<()> {
        let links = geometry.links();
        if !tree.has_frame(&self.shoulder) {
            tree.add_static_transform(
                BODY_FRAME,
                &self.shoulder,
                Transform::from_matrix(geometry.static_body_transform()),
            )?;
        }

        let thigh = joint::shoulder_rotation(angles.alpha) * joint::thigh_transform(angles.beta, links.coxa);
        tree.add_transform(&self.shoulder, &self.thigh, Transform::from_matrix(&thigh), timestamp)?;
        tree.add_transform(
            &self.thigh,
            &self.tibia,
            Transform::from_matrix(&joint::tibia_transform(angles.gamma, links.thigh)),
            timestamp,
        )?;

        if !tree.has_frame(&self.tip) {
            tree.add_static_transform(
                &self.tibia,
                &self.tip,
                Transform::from_matrix(&joint::tip_transform(links.tip)),
            )?;
        }
        Ok(())
    }

    /// Foot tip in the body frame at `timestamp`
    pub fn tip_position(&self, tree: &TFTree, timestamp: u64) -> TFResult<Point3<f64>> {
        let tf = tree.lookup_transform(BODY_FRAME, &self.tip, timestamp)?;
        Ok(tf.transform_point(&Point3::origin()))
    }
}
