//! Node lifecycle
//!
//! A node is initialized once, ticked repeatedly by its owner and shut down
//! once. Nodes never block inside `tick`.

mod leg_node;

pub use leg_node::LegNode;

use crate::communication::CommunicationError;
use crate::error::KinematicsError;
use crate::tf::TFError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),

    #[error(transparent)]
    Tf(#[from] TFError),

    #[error(transparent)]
    Communication(#[from] CommunicationError),

    #[error("Node '{0}' is not initialized")]
    NotInitialized(String),
}

pub type NodeResult<T> = Result<T, NodeError>;

pub trait Node: Send {
    /// Unique node name
    fn name(&self) -> &str;

    /// Called once before the first tick
    fn init(&mut self) -> NodeResult<()> {
        log::info!("{}: initialized", self.name());
        Ok(())
    }

    /// Called repeatedly
    fn tick(&mut self);

    /// Called once after the last tick
    fn shutdown(&mut self) -> NodeResult<()> {
        log::info!("{}: shut down", self.name());
        Ok(())
    }

    /// Topics this node publishes to
    fn get_publishers(&self) -> Vec<String> {
        Vec::new()
    }

    /// Topics this node subscribes to
    fn get_subscribers(&self) -> Vec<String> {
        Vec::new()
    }

    fn on_error(&mut self, error: &str) {
        log::error!("{}: {}", self.name(), error);
    }
}
