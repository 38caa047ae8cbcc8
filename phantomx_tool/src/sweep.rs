//! FK -> IK round trip over the joint ranges

use anyhow::Result;
use phantomx_kinematics::prelude::*;
use serde::Serialize;
use std::fmt;

/// Angles recovered within this distance count as the same branch
const BRANCH_TOLERANCE: f64 = 0.02;

#[derive(Debug, Default, Serialize)]
pub struct SweepReport {
    pub leg: Option<LegName>,
    pub samples: usize,
    /// IK recovered the input angles
    pub consistent: usize,
    /// IK succeeded on another branch
    pub other_branch: usize,
    /// FK rejected the angles
    pub fk_rejected: usize,
    /// IK rejected the FK result
    pub ik_rejected: usize,
    pub worst_error: f64,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leg = self
            .leg
            .map(|l| l.to_string())
            .unwrap_or_else(|| "?".to_string());
        write!(
            f,
            "{}: {} samples, {} consistent, {} other branch, {} fk rejected, {} ik rejected, worst error {:.2e} rad",
            leg,
            self.samples,
            self.consistent,
            self.other_branch,
            self.fk_rejected,
            self.ik_rejected,
            self.worst_error
        )
    }
}

fn linspace([min, max]: [f64; 2], steps: usize) -> Vec<f64> {
    if steps <= 1 {
        return vec![(min + max) / 2.0];
    }
    (0..steps)
        .map(|i| (min + (max - min) * i as f64 / (steps - 1) as f64).clamp(min, max))
        .collect()
}

pub fn run(settings: &RobotSettings, name: LegName, steps: usize) -> Result<SweepReport> {
    let leg = settings.build_leg(name)?;
    let limits = *leg.geometry().limits();
    let mut report = SweepReport {
        leg: Some(name),
        ..Default::default()
    };

    for alpha in linspace(limits.alpha, steps) {
        for beta in linspace(limits.beta, steps) {
            for gamma in linspace(limits.gamma, steps) {
                let angles = JointAngles::new(alpha, beta, gamma);
                report.samples += 1;

                let foot = match leg.compute_forward_kinematics(Some(angles)) {
                    Ok(foot) => foot,
                    Err(e) => {
                        tracing::debug!("{}", e);
                        report.fk_rejected += 1;
                        continue;
                    }
                };

                match leg.compute_inverse_kinematics(Some(foot)) {
                    Ok(solved) => {
                        let error = solved.max_abs_diff(&angles);
                        if error < BRANCH_TOLERANCE {
                            report.consistent += 1;
                            report.worst_error = report.worst_error.max(error);
                        } else {
                            tracing::debug!(
                                "{}: {:?} solved to {:?}",
                                name,
                                angles,
                                solved
                            );
                            report.other_branch += 1;
                        }
                    }
                    Err(e) => {
                        tracing::debug!("{}", e);
                        report.ik_rejected += 1;
                    }
                }
            }
        }
    }

    tracing::info!("{}", report);
    Ok(report)
}
