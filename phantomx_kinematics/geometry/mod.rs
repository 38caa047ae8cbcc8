//! Static leg geometry
//!
//! Everything here is fixed at construction time: leg identity, link offsets,
//! the mounting transform of the shoulder frame in the body frame, joint
//! intervals and the numeric tolerances used by the solvers.
//!
//! Values derived from the geometry (inverse mounting transform, the two
//! fixed link angles used by the inverse solver) are computed once in
//! [`LegGeometry::from_parts`] and never on the hot path.

pub mod phantomx;

use crate::error::{KinematicsError, KinematicsResult};
use crate::kinematics::transform;
use crate::messages::JointAngles;
use nalgebra::{Matrix4, Point3, Vector4};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// The six legs of the hexapod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LegName {
    #[serde(rename = "lf")]
    LeftFront,
    #[serde(rename = "rf")]
    RightFront,
    #[serde(rename = "lm")]
    LeftMiddle,
    #[serde(rename = "rm")]
    RightMiddle,
    #[serde(rename = "lr")]
    LeftRear,
    #[serde(rename = "rr")]
    RightRear,
}

impl LegName {
    /// All legs in table order
    pub const ALL: [LegName; 6] = [
        LegName::LeftFront,
        LegName::RightFront,
        LegName::LeftMiddle,
        LegName::RightMiddle,
        LegName::LeftRear,
        LegName::RightRear,
    ];

    /// Short identifier used in frame and joint names
    pub fn as_str(&self) -> &'static str {
        match self {
            LegName::LeftFront => "lf",
            LegName::RightFront => "rf",
            LegName::LeftMiddle => "lm",
            LegName::RightMiddle => "rm",
            LegName::LeftRear => "lr",
            LegName::RightRear => "rr",
        }
    }

    /// Position of the leg in [`LegName::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn group(&self) -> LegGroup {
        match self {
            LegName::LeftFront | LegName::RightFront => LegGroup::Front,
            LegName::LeftMiddle | LegName::RightMiddle => LegGroup::Middle,
            LegName::LeftRear | LegName::RightRear => LegGroup::Rear,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            LegName::LeftFront | LegName::LeftMiddle | LegName::LeftRear => Side::Left,
            _ => Side::Right,
        }
    }
}

impl fmt::Display for LegName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LegName::ALL
            .iter()
            .copied()
            .find(|leg| leg.as_str() == s)
            .ok_or_else(|| format!("unknown leg '{}', expected one of lf, rf, lm, rm, lr, rr", s))
    }
}

/// Front/middle/rear grouping used for the contact reference positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegGroup {
    Front,
    Middle,
    Rear,
}

impl LegGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegGroup::Front => "front",
            LegGroup::Middle => "middle",
            LegGroup::Rear => "rear",
        }
    }
}

/// Body side of a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Mirroring sign: +1 for left legs, -1 for right legs
    pub fn movement_dir(&self) -> i8 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
        }
    }
}

/// The three actuated joints of a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointId {
    /// Coxa/shoulder joint
    Alpha,
    /// Thigh joint
    Beta,
    /// Tibia joint
    Gamma,
}

impl JointId {
    pub const ALL: [JointId; 3] = [JointId::Alpha, JointId::Beta, JointId::Gamma];

    /// Actuator name for a leg, e.g. `j_thigh_lf`
    pub fn actuator_name(&self, leg: LegName) -> String {
        let prefix = match self {
            JointId::Alpha => "j_c1",
            JointId::Beta => "j_thigh",
            JointId::Gamma => "j_tibia",
        };
        format!("{}_{}", prefix, leg)
    }
}

/// Permissible interval per joint in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointLimits {
    pub alpha: [f64; 2],
    pub beta: [f64; 2],
    pub gamma: [f64; 2],
}

impl Default for JointLimits {
    fn default() -> Self {
        Self {
            alpha: phantomx::ALPHA_RANGE,
            beta: phantomx::BETA_RANGE,
            gamma: phantomx::GAMMA_RANGE,
        }
    }
}

impl JointLimits {
    /// Per-axis range check
    ///
    /// Every axis has to be inside its interval. OR-ing the six bound
    /// comparisons instead would accept any triple.
    pub fn contains(&self, angles: &JointAngles) -> bool {
        let within = |value: f64, [min, max]: [f64; 2]| value >= min && value <= max;
        within(angles.alpha, self.alpha)
            && within(angles.beta, self.beta)
            && within(angles.gamma, self.gamma)
    }

    fn is_valid(&self) -> bool {
        [self.alpha, self.beta, self.gamma]
            .iter()
            .all(|[min, max]| min.is_finite() && max.is_finite() && min <= max)
    }
}

/// Fixed link offsets of the joint transforms
///
/// Offsets are expressed in the parent joint frame, where the leg extends
/// along -Y. `thigh` and `tip` are `(y, z)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOffsets {
    /// Shoulder to thigh joint distance along -Y
    pub coxa: f64,
    /// Thigh joint to tibia joint
    pub thigh: [f64; 2],
    /// Tibia joint to the foot tip
    pub tip: [f64; 2],
}

impl Default for LinkOffsets {
    fn default() -> Self {
        Self {
            coxa: phantomx::COXA_LENGTH,
            thigh: phantomx::THIGH_TIBIA_OFFSET,
            tip: phantomx::TIBIA_TIP_OFFSET,
        }
    }
}

impl LinkOffsets {
    /// Segment lengths implied by the offsets
    pub fn segment_lengths(&self) -> [f64; 3] {
        [
            self.coxa,
            self.thigh[0].hypot(self.thigh[1]),
            self.tip[0].hypot(self.tip[1]),
        ]
    }
}

/// Numeric tolerances of the solvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsTolerances {
    /// Allowed disagreement of the re-derived shoulder angle (rad)
    pub alpha_check: f64,
    /// How far a law-of-cosines ratio may overshoot +-1 and still be clamped
    pub cosine_clamp: f64,
}

impl Default for KinematicsTolerances {
    fn default() -> Self {
        Self {
            alpha_check: phantomx::ALPHA_CHECK_TOLERANCE,
            cosine_clamp: phantomx::COSINE_CLAMP_TOLERANCE,
        }
    }
}

/// Immutable geometry of one leg
#[derive(Debug, Clone)]
pub struct LegGeometry {
    name: LegName,
    segment_lengths: [f64; 3],
    links: LinkOffsets,
    static_body_transform: Matrix4<f64>,
    body_to_shoulder: Matrix4<f64>,
    movement_dir: i8,
    limits: JointLimits,
    tolerances: KinematicsTolerances,
    thigh_tibia_angle: f64,
    tibia_z_offset_angle: f64,
}

impl LegGeometry {
    /// Geometry with PhantomX link offsets, joint limits and tolerances
    pub fn new(
        name: LegName,
        segment_lengths: [f64; 3],
        static_body_transform: Matrix4<f64>,
        movement_dir: i8,
    ) -> KinematicsResult<Self> {
        Self::from_parts(
            name,
            segment_lengths,
            LinkOffsets::default(),
            static_body_transform,
            movement_dir,
            JointLimits::default(),
            KinematicsTolerances::default(),
        )
    }

    /// Default PhantomX geometry for a leg
    pub fn phantomx(name: LegName) -> Self {
        let mount = phantomx::mount(name);
        let links = LinkOffsets::default();
        Self::assemble(
            name,
            links.segment_lengths(),
            links,
            transform::mount_transform(mount.position, mount.heading),
            name.side().movement_dir(),
            JointLimits::default(),
            KinematicsTolerances::default(),
        )
    }

    /// Validate and assemble a geometry
    pub fn from_parts(
        name: LegName,
        segment_lengths: [f64; 3],
        links: LinkOffsets,
        static_body_transform: Matrix4<f64>,
        movement_dir: i8,
        limits: JointLimits,
        tolerances: KinematicsTolerances,
    ) -> KinematicsResult<Self> {
        let invalid = |reason: String| KinematicsError::InvalidGeometry { leg: name, reason };

        if segment_lengths.iter().any(|l| !(l.is_finite() && *l > 0.0)) {
            return Err(invalid(format!(
                "segment lengths must be positive, got {:?}",
                segment_lengths
            )));
        }

        let implied = links.segment_lengths();
        for (i, (given, derived)) in segment_lengths.iter().zip(implied.iter()).enumerate() {
            if (given - derived).abs() > phantomx::SEGMENT_LENGTH_TOLERANCE {
                return Err(invalid(format!(
                    "segment {} has length {:.4} but its link offsets imply {:.4}",
                    i, given, derived
                )));
            }
        }

        if movement_dir != 1 && movement_dir != -1 {
            return Err(invalid(format!(
                "movement_dir must be 1 or -1, got {}",
                movement_dir
            )));
        }

        if !transform::is_rigid(&static_body_transform, phantomx::RIGIDITY_TOLERANCE) {
            return Err(invalid(
                "static body transform is not a rigid homogeneous transform".to_string(),
            ));
        }

        if !limits.is_valid() {
            return Err(invalid(format!("invalid joint limits {:?}", limits)));
        }

        if !(tolerances.alpha_check > 0.0 && tolerances.cosine_clamp >= 0.0) {
            return Err(invalid(format!("invalid tolerances {:?}", tolerances)));
        }

        let leg = Self::assemble(
            name,
            segment_lengths,
            links,
            static_body_transform,
            movement_dir,
            limits,
            tolerances,
        );

        if (2.0 * leg.tibia_z_offset_angle - leg.thigh_tibia_angle).abs() > 1e-4 {
            log::warn!(
                "leg {}: thigh link bend {:.4} is not twice the tip bend {:.4}, tibia angles from inverse kinematics will carry an offset",
                name,
                leg.thigh_tibia_angle,
                leg.tibia_z_offset_angle
            );
        }

        Ok(leg)
    }

    fn assemble(
        name: LegName,
        segment_lengths: [f64; 3],
        links: LinkOffsets,
        static_body_transform: Matrix4<f64>,
        movement_dir: i8,
        limits: JointLimits,
        tolerances: KinematicsTolerances,
    ) -> Self {
        // Nominal chain with all joints at zero
        let thigh_joint = transform::thigh_transform(0.0, links.coxa) * origin();
        let tibia_joint = transform::thigh_transform(0.0, links.coxa)
            * transform::tibia_transform(0.0, links.thigh)
            * origin();
        let thigh_tibia_angle =
            -(tibia_joint.x - thigh_joint.x).atan2(thigh_joint.y - tibia_joint.y);
        let tibia_z_offset_angle = PI - links.tip[1].atan2(links.tip[0]);

        Self {
            name,
            segment_lengths,
            links,
            body_to_shoulder: transform::rigid_inverse(&static_body_transform),
            static_body_transform,
            movement_dir,
            limits,
            tolerances,
            thigh_tibia_angle,
            tibia_z_offset_angle,
        }
    }

    pub fn name(&self) -> LegName {
        self.name
    }

    pub fn segment_lengths(&self) -> [f64; 3] {
        self.segment_lengths
    }

    pub fn links(&self) -> &LinkOffsets {
        &self.links
    }

    /// Shoulder frame to body frame
    pub fn static_body_transform(&self) -> &Matrix4<f64> {
        &self.static_body_transform
    }

    /// Body frame to shoulder frame
    pub fn body_to_shoulder(&self) -> &Matrix4<f64> {
        &self.body_to_shoulder
    }

    pub fn movement_dir(&self) -> i8 {
        self.movement_dir
    }

    pub fn limits(&self) -> &JointLimits {
        &self.limits
    }

    pub fn tolerances(&self) -> &KinematicsTolerances {
        &self.tolerances
    }

    /// Angle of the thigh link against the coxa axis in the zero pose
    pub fn thigh_tibia_angle(&self) -> f64 {
        self.thigh_tibia_angle
    }

    /// Fixed angle of the tibia-to-tip link
    pub fn tibia_z_offset_angle(&self) -> f64 {
        self.tibia_z_offset_angle
    }

    /// Shoulder joint position in the body frame
    pub fn shoulder_position(&self) -> Point3<f64> {
        let t = self.static_body_transform * origin();
        Point3::new(t.x, t.y, t.z)
    }

    /// Maximum distance from the shoulder to the tip
    pub fn reach(&self) -> f64 {
        self.segment_lengths.iter().sum()
    }
}

fn origin() -> Vector4<f64> {
    Vector4::new(0.0, 0.0, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_name_round_trip() {
        for leg in LegName::ALL {
            assert_eq!(leg.as_str().parse::<LegName>().unwrap(), leg);
            assert_eq!(LegName::ALL[leg.index()], leg);
        }
        assert!("xx".parse::<LegName>().is_err());
    }

    #[test]
    fn test_leg_groups_and_sides() {
        assert_eq!(LegName::LeftFront.group(), LegGroup::Front);
        assert_eq!(LegName::RightMiddle.group(), LegGroup::Middle);
        assert_eq!(LegName::RightRear.group(), LegGroup::Rear);
        assert_eq!(LegName::LeftRear.side().movement_dir(), 1);
        assert_eq!(LegName::RightFront.side().movement_dir(), -1);
    }

    #[test]
    fn test_actuator_names() {
        assert_eq!(JointId::Alpha.actuator_name(LegName::LeftFront), "j_c1_lf");
        assert_eq!(JointId::Beta.actuator_name(LegName::RightRear), "j_thigh_rr");
        assert_eq!(JointId::Gamma.actuator_name(LegName::LeftMiddle), "j_tibia_lm");
    }

    #[test]
    fn test_joint_limits_per_axis() {
        let limits = JointLimits::default();
        assert!(limits.contains(&JointAngles::new(0.0, 0.0, 0.0)));
        assert!(limits.contains(&JointAngles::new(0.6, -1.0, 1.0)));
        assert!(!limits.contains(&JointAngles::new(0.61, 0.0, 0.0)));
        assert!(!limits.contains(&JointAngles::new(0.0, 0.35, 0.0)));
        assert!(!limits.contains(&JointAngles::new(0.0, 0.0, -1.2)));
    }

    #[test]
    fn test_joint_limits_require_every_axis() {
        let limits = JointLimits::default();
        // Each triple satisfies some bound comparison on every axis
        assert!(!limits.contains(&JointAngles::new(0.0, 0.0, 5.0)));
        assert!(!limits.contains(&JointAngles::new(-3.0, 0.0, 0.0)));
        assert!(!limits.contains(&JointAngles::new(3.0, 3.0, 3.0)));
        assert!(!limits.contains(&JointAngles::new(f64::NAN, 0.0, 0.0)));
    }

    #[test]
    fn test_phantomx_geometry_constants() {
        let leg = LegGeometry::phantomx(LegName::LeftFront);
        assert!((leg.tibia_z_offset_angle() - 0.124_354_994_546_761_24).abs() < 1e-12);
        assert!((leg.thigh_tibia_angle() - 2.0 * leg.tibia_z_offset_angle()).abs() < 1e-4);
        assert!((leg.segment_lengths()[0] - 0.054).abs() < 1e-12);
        assert!((leg.reach() - 0.2818).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_non_positive_segment() {
        let err = LegGeometry::new(
            LegName::LeftFront,
            [0.054, 0.0, 0.161],
            Matrix4::identity(),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, KinematicsError::InvalidGeometry { leg: LegName::LeftFront, .. }));
    }

    #[test]
    fn test_rejects_segments_disagreeing_with_links() {
        let result = LegGeometry::new(
            LegName::LeftFront,
            [0.054, 0.0645, 0.16],
            Matrix4::identity(),
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_movement_dir() {
        let lengths = LinkOffsets::default().segment_lengths();
        let result = LegGeometry::new(LegName::RightFront, lengths, Matrix4::identity(), 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_rigid_transform() {
        let lengths = LinkOffsets::default().segment_lengths();
        let mut scaled = Matrix4::identity();
        scaled[(0, 0)] = 2.0;
        assert!(LegGeometry::new(LegName::LeftMiddle, lengths, scaled, 1).is_err());

        let mut mirrored = Matrix4::identity();
        mirrored[(1, 1)] = -1.0;
        assert!(LegGeometry::new(LegName::LeftMiddle, lengths, mirrored, 1).is_err());
    }

    #[test]
    fn test_body_to_shoulder_is_inverse() {
        let leg = LegGeometry::phantomx(LegName::RightRear);
        let product = leg.static_body_transform() * leg.body_to_shoulder();
        assert!((product - Matrix4::identity()).norm() < 1e-12);
    }
}
