//! Ground contact heuristic

use crate::geometry::{phantomx, LegGroup};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Reference foot placement used to guess ground contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactReference {
    /// Initial anterior extreme position of the leg group
    pub aep: [f64; 3],
    /// Fraction of the AEP height the foot has to drop below
    pub height_factor: f64,
    /// Allowed X distance from the mirrored AEP (m)
    pub x_tolerance: f64,
}

impl ContactReference {
    /// PhantomX reference for a leg group
    pub fn for_group(group: LegGroup) -> Self {
        Self {
            aep: phantomx::initial_aep(group),
            height_factor: phantomx::PREDICTED_GROUND_CONTACT_HEIGHT_FACTOR,
            x_tolerance: phantomx::CONTACT_X_TOLERANCE,
        }
    }

    /// Z below which the foot counts as low enough
    pub fn height_threshold(&self) -> f64 {
        self.aep[2] * self.height_factor
    }

    /// `ee.z < aep.z * factor` and `|ee.x + movement_dir * aep.x| < x_tolerance`
    pub fn predicts_contact(&self, ee: &Point3<f64>, movement_dir: i8) -> bool {
        let low_enough = ee.z < self.height_threshold();
        let near_aep = (ee.x + f64::from(movement_dir) * self.aep[0]).abs() < self.x_tolerance;
        low_enough && near_aep
    }
}
