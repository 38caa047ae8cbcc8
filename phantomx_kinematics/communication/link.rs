//! Bounded in-process topic

use super::{CommunicationError, CommunicationResult, Publisher, Subscriber};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};

/// Single topic carried by a bounded crossbeam channel
///
/// Clones share the same channel, so a clone can serve as the publisher
/// while another acts as the subscriber. Every clone also holds a receiver,
/// so sending fails only when the channel is full.
#[derive(Debug, Clone)]
pub struct Link<T> {
    topic: String,
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> Link<T> {
    pub fn new(topic: impl Into<String>, capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity.max(1));
        Self {
            topic: topic.into(),
            sender,
            receiver,
        }
    }

    /// Messages waiting to be received
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Receive everything currently queued
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: Send + std::fmt::Debug> Publisher<T> for Link<T> {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn send(&self, msg: T) -> CommunicationResult<()> {
        self.sender.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => CommunicationError::Full(self.topic.clone()),
            // Unreachable while `self.receiver` is alive
            TrySendError::Disconnected(_) => CommunicationError::Disconnected(self.topic.clone()),
        })
    }
}

impl<T: Send + std::fmt::Debug> Subscriber<T> for Link<T> {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    fn has_messages(&self) -> bool {
        !self.receiver.is_empty()
    }
}
