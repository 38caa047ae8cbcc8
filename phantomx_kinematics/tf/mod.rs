//! Transform frames
//!
//! A small TF tree used to publish leg frames and to compute forward
//! kinematics by named-frame lookup, as a cross-check of the analytic chain.
//!
//! ```rust,ignore
//! use phantomx_kinematics::tf::{LegFrames, TFTree, BODY_FRAME};
//!
//! let mut tree = TFTree::new(BODY_FRAME);
//! let frames = LegFrames::new(LegName::LeftFront);
//! frames.publish(&mut tree, &geometry, &angles, timestamp_now())?;
//! let tip = frames.tip_position(&tree, u64::MAX)?;
//! ```

mod buffer;
mod leg_frames;
mod transform;
mod tree;

pub use buffer::TransformHistory;
pub use leg_frames::LegFrames;
pub use transform::Transform;
pub use tree::{TFError, TFResult, TFTree};

pub use crate::messages::timestamp_now;

/// Robot body frame
pub const BODY_FRAME: &str = "MP_BODY";
