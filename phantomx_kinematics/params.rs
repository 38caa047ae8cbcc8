//! Robot configuration
//!
//! [`RobotSettings`] holds everything needed to build the six legs. The
//! defaults describe the PhantomX; a YAML file only needs to list the values
//! it changes.
//!
//! ```yaml
//! tracking_threshold: 0.02
//! contact:
//!   height_factor: 0.8
//! legs:
//!   - name: lf
//!     position: [-0.1248, -0.06164, 0.001116]
//!     heading: -2.356194490192345
//! ```

use crate::error::KinematicsError;
use crate::geometry::{
    phantomx, JointLimits, KinematicsTolerances, LegGeometry, LegGroup, LegName, LinkOffsets,
};
use crate::kinematics::transform::mount_transform;
use crate::leg::{ContactReference, LegKinematics};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("No mount configured for leg {0}")]
    MissingLeg(LegName),

    #[error(transparent)]
    Geometry(#[from] KinematicsError),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Shoulder placement of one leg on the body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegMount {
    pub name: LegName,
    /// Shoulder joint in the body frame (m)
    pub position: [f64; 3],
    /// Outward direction of the leg around body Z (rad)
    pub heading: f64,
}

impl LegMount {
    pub fn phantomx(name: LegName) -> Self {
        let mount = phantomx::mount(name);
        Self {
            name,
            position: mount.position,
            heading: mount.heading,
        }
    }
}

/// Ground contact heuristic settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    pub front_initial_aep: [f64; 3],
    pub middle_initial_aep: [f64; 3],
    pub hind_initial_aep: [f64; 3],
    pub height_factor: f64,
    pub x_tolerance: f64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            front_initial_aep: phantomx::FRONT_INITIAL_AEP,
            middle_initial_aep: phantomx::MIDDLE_INITIAL_AEP,
            hind_initial_aep: phantomx::HIND_INITIAL_AEP,
            height_factor: phantomx::PREDICTED_GROUND_CONTACT_HEIGHT_FACTOR,
            x_tolerance: phantomx::CONTACT_X_TOLERANCE,
        }
    }
}

impl ContactSettings {
    pub fn reference(&self, group: LegGroup) -> ContactReference {
        let aep = match group {
            LegGroup::Front => self.front_initial_aep,
            LegGroup::Middle => self.middle_initial_aep,
            LegGroup::Rear => self.hind_initial_aep,
        };
        ContactReference {
            aep,
            height_factor: self.height_factor,
            x_tolerance: self.x_tolerance,
        }
    }
}

/// Geometry and tuning of the whole robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotSettings {
    /// Link lengths for the inverse solver; derived from `links` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_lengths: Option<[f64; 3]>,
    pub links: LinkOffsets,
    pub joint_limits: JointLimits,
    pub tolerances: KinematicsTolerances,
    /// A joint counts as reached below this tracking error (rad)
    pub tracking_threshold: f64,
    pub contact: ContactSettings,
    pub legs: Vec<LegMount>,
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self {
            segment_lengths: None,
            links: LinkOffsets::default(),
            joint_limits: JointLimits::default(),
            tolerances: KinematicsTolerances::default(),
            tracking_threshold: phantomx::TRACKING_THRESHOLD,
            contact: ContactSettings::default(),
            legs: LegName::ALL.iter().map(|leg| LegMount::phantomx(*leg)).collect(),
        }
    }
}

impl RobotSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml_str(&yaml)?;
        log::info!("Loaded robot settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` when given, PhantomX defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, self.to_yaml_string()?).map_err(io_error)?;
        Ok(())
    }

    /// Every leg has a mount and a valid geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tracking_threshold.is_finite() && self.tracking_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tracking_threshold must be positive, got {}",
                self.tracking_threshold
            )));
        }
        if !(self.contact.height_factor.is_finite() && self.contact.x_tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "invalid contact settings {:?}",
                self.contact
            )));
        }
        for leg in LegName::ALL {
            self.leg_geometry(leg)?;
        }
        Ok(())
    }

    pub fn segment_lengths(&self) -> [f64; 3] {
        self.segment_lengths
            .unwrap_or_else(|| self.links.segment_lengths())
    }

    /// Mount of a leg; the last entry wins when a leg is listed twice
    pub fn mount(&self, leg: LegName) -> Option<&LegMount> {
        self.legs.iter().rev().find(|m| m.name == leg)
    }

    pub fn leg_geometry(&self, leg: LegName) -> Result<LegGeometry, ConfigError> {
        let mount = self.mount(leg).ok_or(ConfigError::MissingLeg(leg))?;
        Ok(LegGeometry::from_parts(
            leg,
            self.segment_lengths(),
            self.links,
            mount_transform(mount.position, mount.heading),
            leg.side().movement_dir(),
            self.joint_limits,
            self.tolerances,
        )?)
    }

    pub fn contact_reference(&self, group: LegGroup) -> ContactReference {
        self.contact.reference(group)
    }

    /// Leg ready to receive feedback, without a command sink
    pub fn build_leg(&self, leg: LegName) -> Result<LegKinematics, ConfigError> {
        Ok(LegKinematics::new(self.leg_geometry(leg)?)
            .with_contact_reference(self.contact_reference(leg.group()))
            .with_tracking_threshold(self.tracking_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_builtin_geometry() {
        let settings = RobotSettings::default();
        settings.validate().unwrap();
        for leg in LegName::ALL {
            let configured = settings.leg_geometry(leg).unwrap();
            let builtin = LegGeometry::phantomx(leg);
            let diff = configured.static_body_transform() - builtin.static_body_transform();
            assert!(diff.norm() < 1e-12);
            assert_eq!(configured.movement_dir(), builtin.movement_dir());
        }
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut settings = RobotSettings::default();
        settings.tracking_threshold = 0.02;
        settings.contact.height_factor = 0.8;
        let yaml = settings.to_yaml_string().unwrap();
        let back = RobotSettings::from_yaml_str(&yaml).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "tracking_threshold: 0.05\ncontact:\n  height_factor: 0.5\n";
        let settings = RobotSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.tracking_threshold, 0.05);
        assert_eq!(settings.contact.height_factor, 0.5);
        assert_eq!(settings.contact.front_initial_aep, phantomx::FRONT_INITIAL_AEP);
        assert_eq!(settings.links, LinkOffsets::default());
        assert_eq!(settings.legs.len(), 6);
    }

    #[test]
    fn test_missing_leg() {
        let yaml = "legs:\n  - name: lf\n    position: [0.0, 0.0, 0.0]\n    heading: 0.0\n";
        let err = RobotSettings::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingLeg(LegName::RightFront)));
    }

    #[test]
    fn test_unknown_leg_name_rejected() {
        let yaml = "legs:\n  - name: xx\n    position: [0.0, 0.0, 0.0]\n    heading: 0.0\n";
        assert!(matches!(
            RobotSettings::from_yaml_str(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_inconsistent_segments_rejected() {
        let mut settings = RobotSettings::default();
        settings.segment_lengths = Some([0.054, 0.1, 0.16]);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Geometry(KinematicsError::InvalidGeometry { .. }))
        ));
    }

    #[test]
    fn test_build_leg_uses_settings() {
        let mut settings = RobotSettings::default();
        settings.contact.hind_initial_aep = [-0.3, 0.2, -0.1];
        let leg = settings.build_leg(LegName::RightRear).unwrap();
        assert_eq!(leg.name(), LegName::RightRear);
        assert_eq!(leg.contact_reference().aep, [-0.3, 0.2, -0.1]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("phantomx_settings_{}", std::process::id()));
        let path = dir.join("robot.yaml");
        let settings = RobotSettings::default();
        settings.save(&path).unwrap();
        let loaded = RobotSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        std::fs::remove_dir_all(&dir).ok();

        assert!(matches!(
            RobotSettings::load(dir.join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
