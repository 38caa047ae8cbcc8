//! phantomx_tool - command line access to the leg kinematics
//!
//! ```text
//! phantomx_tool fk lf 0.0 0.2 -0.5
//! phantomx_tool ik lf -0.24 -0.24 -0.13
//! phantomx_tool sweep --leg rm --steps 9
//! phantomx_tool --config robot.yaml config
//! ```

mod sweep;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phantomx_kinematics::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "phantomx_tool")]
#[command(about = "Forward/inverse kinematics for PhantomX hexapod legs", long_about = None)]
#[command(version)]
struct Cli {
    /// Robot settings (YAML); PhantomX defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Foot position for joint angles (rad)
    Fk {
        /// Leg: lf, rf, lm, rm, lr, rr
        leg: LegName,
        #[arg(allow_hyphen_values = true)]
        alpha: f64,
        #[arg(allow_hyphen_values = true)]
        beta: f64,
        #[arg(allow_hyphen_values = true)]
        gamma: f64,
    },

    /// Joint angles for a foot position in the body frame (m)
    Ik {
        leg: LegName,
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
        #[arg(allow_hyphen_values = true)]
        z: f64,
    },

    /// FK -> IK round trip over the joint ranges
    Sweep {
        /// Only sweep this leg
        #[arg(short, long)]
        leg: Option<LegName>,

        /// Samples per joint
        #[arg(short, long, default_value_t = 7)]
        steps: usize,
    },

    /// Print the effective configuration as YAML
    Config,
}

#[derive(Serialize)]
struct FkOutput {
    leg: LegName,
    angles: JointAngles,
    position: [f64; 3],
    ground_contact: bool,
}

#[derive(Serialize)]
struct IkOutput {
    leg: LegName,
    target: [f64; 3],
    angles: JointAngles,
    within_limits: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phantomx_tool=info,phantomx_kinematics=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = RobotSettings::load_or_default(cli.config.as_deref())
        .context("Failed to load robot settings")?;

    match cli.command {
        Commands::Fk {
            leg,
            alpha,
            beta,
            gamma,
        } => run_fk(&settings, leg, JointAngles::new(alpha, beta, gamma), cli.json),
        Commands::Ik { leg, x, y, z } => run_ik(&settings, leg, Point3::new(x, y, z), cli.json),
        Commands::Sweep { leg, steps } => {
            let legs: Vec<LegName> = match leg {
                Some(leg) => vec![leg],
                None => LegName::ALL.to_vec(),
            };
            let reports = legs
                .iter()
                .map(|leg| sweep::run(&settings, *leg, steps))
                .collect::<Result<Vec<_>>>()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", report);
                }
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", settings.to_yaml_string()?);
            Ok(())
        }
    }
}

fn run_fk(settings: &RobotSettings, name: LegName, angles: JointAngles, json: bool) -> Result<()> {
    let leg = settings.build_leg(name)?;
    let p = leg
        .compute_forward_kinematics(Some(angles))
        .with_context(|| format!("Forward kinematics failed for leg {}", name))?;

    // Feed the angles back as settled joints so the contact heuristic sees this pose
    for joint in JointId::ALL {
        leg.update_joint(joint, &JointFeedback::settled(angles.get(joint)));
    }
    let output = FkOutput {
        leg: name,
        angles,
        position: [p.x, p.y, p.z],
        ground_contact: leg.predicted_ground_contact(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{}: ({:.5}, {:.5}, {:.5}) m{}",
            name,
            p.x,
            p.y,
            p.z,
            if output.ground_contact {
                "  [ground contact]"
            } else {
                ""
            }
        );
    }
    Ok(())
}

fn run_ik(settings: &RobotSettings, name: LegName, target: Point3<f64>, json: bool) -> Result<()> {
    let leg = settings.build_leg(name)?;
    let angles = leg
        .compute_inverse_kinematics(Some(target))
        .with_context(|| format!("Inverse kinematics failed for leg {}", name))?;
    let within_limits = leg.geometry().limits().contains(&angles);
    if !within_limits {
        tracing::warn!("Solution for {} lies outside the joint limits", name);
    }

    let output = IkOutput {
        leg: name,
        target: [target.x, target.y, target.z],
        angles,
        within_limits,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{}: alpha={:.5} beta={:.5} gamma={:.5} rad",
            name, angles.alpha, angles.beta, angles.gamma
        );
    }
    Ok(())
}
