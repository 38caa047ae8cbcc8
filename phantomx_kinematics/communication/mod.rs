//! Message passing seams
//!
//! [`Publisher`] and [`Subscriber`] are the only interfaces the kinematics
//! code uses to reach actuators and controllers, so any transport can sit
//! behind them. [`Link`] is a bounded in-process channel used by tools and tests.

pub mod link;

pub use link::Link;

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommunicationError {
    #[error("Topic '{0}' is full")]
    Full(String),

    /// Reported by transports whose receiving side can go away. A [`Link`]
    /// owns its own receiver, so it never returns this.
    #[error("Topic '{0}' has no receiver")]
    Disconnected(String),
}

pub type CommunicationResult<T> = Result<T, CommunicationError>;

/// Sending half of a topic
pub trait Publisher<T>: Send + Sync + Debug {
    /// Topic name
    fn topic(&self) -> &str;

    /// Send without blocking
    fn send(&self, msg: T) -> CommunicationResult<()>;

    fn try_send(&self, msg: T) -> bool {
        self.send(msg).is_ok()
    }
}

/// Receiving half of a topic
pub trait Subscriber<T>: Send + Sync + Debug {
    fn topic(&self) -> &str;

    /// Receive without blocking
    fn recv(&self) -> Option<T>;

    fn has_messages(&self) -> bool {
        false
    }
}
