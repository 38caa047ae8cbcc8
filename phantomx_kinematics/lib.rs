//! # PhantomX Leg Kinematics
//!
//! Kinematics core for a single leg of a PhantomX hexapod.
//!
//! ## Structure
//!
//! ```text
//! phantomx_kinematics/
//! ── error.rs        # Typed kinematics failures
//! ── geometry/       # Leg names, link offsets, joint limits, default tables
//! ── kinematics/     # Joint transforms, forward chain, analytic inverse
//! ── leg/            # LegKinematics, joint state, ground contact
//! ── messages/       # Joint feedback and leg command messages
//! ── communication/  # Publisher/Subscriber traits and in-process links
//! ── tf/             # Transform frame tree used for the cross-check FK path
//! ── nodes/          # LegNode gluing feedback, IK and commands together
//! ── params.rs       # RobotSettings (YAML configuration)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use phantomx_kinematics::prelude::*;
//!
//! let settings = RobotSettings::default();
//! let leg = LegKinematics::new(settings.leg_geometry(LegName::LeftFront)?);
//!
//! // Angles -> foot position (body frame)
//! let foot = leg.compute_forward_kinematics(Some(JointAngles::new(0.0, 0.2, -0.5)))?;
//!
//! // Foot position -> angles
//! let angles = leg.compute_inverse_kinematics(Some(foot))?;
//! ```

pub mod communication;
pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod leg;
pub mod messages;
pub mod nodes;
pub mod params;
pub mod tf;

pub use error::{AngleFault, KinematicsError, KinematicsResult};
pub use geometry::{
    JointId, JointLimits, KinematicsTolerances, LegGeometry, LegGroup, LegName, LinkOffsets, Side,
};
pub use leg::{ContactReference, JointState, LegKinematics};
pub use messages::{FootTarget, JointAngles, JointFeedback, LegCommand, LogSummary};
pub use params::{ConfigError, RobotSettings};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::communication::{Link, Publisher, Subscriber};
    pub use crate::error::{AngleFault, KinematicsError, KinematicsResult};
    pub use crate::geometry::{JointId, JointLimits, LegGeometry, LegGroup, LegName, Side};
    pub use crate::leg::{ContactReference, JointState, LegKinematics};
    pub use crate::messages::{FootTarget, JointAngles, JointFeedback, LegCommand};
    pub use crate::nodes::{LegNode, Node};
    pub use crate::params::RobotSettings;
    pub use crate::tf::{LegFrames, TFTree, Transform};
    pub use nalgebra::Point3;
}
