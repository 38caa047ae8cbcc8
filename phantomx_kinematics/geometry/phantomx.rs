//! PhantomX hexapod reference values
//!
//! Body frame `MP_BODY`: X points backward, Y to the right, Z up. Front legs
//! sit at negative X, left legs at negative Y.

use super::{LegGroup, LegName};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Shoulder to thigh joint (m)
pub const COXA_LENGTH: f64 = 0.054;
/// Thigh joint to tibia joint, `(y, z)` in the thigh frame (m)
pub const THIGH_TIBIA_OFFSET: [f64; 2] = [-0.0645, -0.016_381];
/// Tibia joint to foot tip, `(y, z)` in the tibia frame (m)
pub const TIBIA_TIP_OFFSET: [f64; 2] = [-0.16, 0.02];

/// Height of every shoulder joint above the body origin (m)
pub const MOUNT_HEIGHT: f64 = 0.001116;
const CORNER_MOUNT_X: f64 = 0.1248;
const CORNER_MOUNT_Y: f64 = 0.06164;
const MIDDLE_MOUNT_Y: f64 = 0.1034;

pub const ALPHA_RANGE: [f64; 2] = [-0.6, 0.6];
pub const BETA_RANGE: [f64; 2] = [-1.0, 0.3];
pub const GAMMA_RANGE: [f64; 2] = [-1.0, 1.0];

pub const ALPHA_CHECK_TOLERANCE: f64 = 0.01;
pub const COSINE_CLAMP_TOLERANCE: f64 = 1e-6;
pub const SEGMENT_LENGTH_TOLERANCE: f64 = 1e-3;
pub const RIGIDITY_TOLERANCE: f64 = 1e-6;

/// A joint counts as reached below this tracking error (rad)
pub const TRACKING_THRESHOLD: f64 = 0.01;

/// Initial anterior extreme positions per leg group
pub const FRONT_INITIAL_AEP: [f64; 3] = [0.25, 0.24, -0.12];
pub const MIDDLE_INITIAL_AEP: [f64; 3] = [0.04, 0.30, -0.12];
pub const HIND_INITIAL_AEP: [f64; 3] = [-0.24, 0.24, -0.12];

/// Fraction of the AEP height below which the foot counts as low enough
pub const PREDICTED_GROUND_CONTACT_HEIGHT_FACTOR: f64 = 0.75;
/// Allowed X distance from the mirrored AEP (m)
pub const CONTACT_X_TOLERANCE: f64 = 0.025;

/// Where a shoulder sits on the body and which way it points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mount {
    pub position: [f64; 3],
    /// Outward direction of the leg around body Z (rad)
    pub heading: f64,
}

pub fn mount(leg: LegName) -> Mount {
    let (x, y, heading) = match leg {
        LegName::LeftFront => (-CORNER_MOUNT_X, -CORNER_MOUNT_Y, -3.0 * FRAC_PI_4),
        LegName::RightFront => (-CORNER_MOUNT_X, CORNER_MOUNT_Y, 3.0 * FRAC_PI_4),
        LegName::LeftMiddle => (0.0, -MIDDLE_MOUNT_Y, -FRAC_PI_2),
        LegName::RightMiddle => (0.0, MIDDLE_MOUNT_Y, FRAC_PI_2),
        LegName::LeftRear => (CORNER_MOUNT_X, -CORNER_MOUNT_Y, -FRAC_PI_4),
        LegName::RightRear => (CORNER_MOUNT_X, CORNER_MOUNT_Y, FRAC_PI_4),
    };
    Mount {
        position: [x, y, MOUNT_HEIGHT],
        heading,
    }
}

pub fn initial_aep(group: LegGroup) -> [f64; 3] {
    match group {
        LegGroup::Front => FRONT_INITIAL_AEP,
        LegGroup::Middle => MIDDLE_INITIAL_AEP,
        LegGroup::Rear => HIND_INITIAL_AEP,
    }
}
