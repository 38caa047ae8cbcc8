//! Timestamped transform history of a dynamic frame

use super::transform::Transform;
use std::collections::VecDeque;

/// Bounded, time-ordered samples of one frame's transform
#[derive(Debug, Clone)]
pub struct TransformHistory {
    samples: VecDeque<(u64, Transform)>,
    capacity: usize,
}

impl TransformHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert a sample, keeping timestamps ordered and dropping the oldest when full
    ///
    /// A sample with an existing timestamp replaces the stored one.
    pub fn push(&mut self, timestamp: u64, transform: Transform) {
        match self.samples.binary_search_by_key(&timestamp, |(t, _)| *t) {
            Ok(i) => self.samples[i].1 = transform,
            Err(i) => {
                self.samples.insert(i, (timestamp, transform));
                if self.samples.len() > self.capacity {
                    self.samples.pop_front();
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<(u64, Transform)> {
        self.samples.back().copied()
    }

    /// `(oldest, newest)` timestamps
    pub fn time_range(&self) -> Option<(u64, u64)> {
        Some((self.samples.front()?.0, self.samples.back()?.0))
    }

    /// Transform at `timestamp`
    ///
    /// Outside the stored range the nearest sample is returned; between two
    /// samples the transform is interpolated.
    pub fn at(&self, timestamp: u64) -> Option<Transform> {
        let (oldest, newest) = self.time_range()?;
        if timestamp <= oldest {
            return self.samples.front().map(|(_, tf)| *tf);
        }
        if timestamp >= newest {
            return self.samples.back().map(|(_, tf)| *tf);
        }

        let after = self.samples.partition_point(|(t, _)| *t <= timestamp);
        let (t0, before_tf) = self.samples[after - 1];
        let (t1, after_tf) = self.samples[after];
        let fraction = (timestamp - t0) as f64 / (t1 - t0) as f64;
        Some(before_tf.interpolate(&after_tf, fraction))
    }

    /// Drop samples older than `timestamp`, always keeping the newest
    pub fn prune_before(&mut self, timestamp: u64) {
        while self.samples.len() > 1 && self.samples.front().is_some_and(|(t, _)| *t < timestamp) {
            self.samples.pop_front();
        }
    }
}
