//! Message types exchanged between a leg and its actuators
//!
//! - **Control**: joint angle triples, per-joint feedback, leg commands, foot targets

pub mod control;

pub use control::{FootTarget, JointAngles, JointFeedback, LegCommand};

/// Compact, log-friendly rendering of a message
pub trait LogSummary {
    fn log_summary(&self) -> String;
}

/// Nanoseconds since the Unix epoch
pub fn timestamp_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
