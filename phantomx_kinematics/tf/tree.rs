//! Frame hierarchy and transform lookup

use super::buffer::TransformHistory;
use super::transform::Transform;
use std::collections::HashMap;
use thiserror::Error;

/// Samples kept per dynamic frame
const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// TF errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TFError {
    #[error("Frame '{0}' not found")]
    FrameNotFound(String),

    #[error("Parent frame '{0}' does not exist")]
    ParentNotFound(String),

    #[error("No common ancestor found between '{0}' and '{1}'")]
    NoCommonAncestor(String, String),

    #[error("Frame '{0}' cannot be its own ancestor")]
    CycleDetected(String),

    #[error("Frame '{0}' has no transform at time {1}")]
    TransformNotAvailable(String, u64),
}

pub type TFResult<T> = Result<T, TFError>;

#[derive(Debug, Clone)]
enum FrameTransform {
    Root,
    Static(Transform),
    Dynamic(TransformHistory),
}

#[derive(Debug, Clone)]
struct Frame {
    parent: Option<String>,
    transform: FrameTransform,
}

impl Frame {
    fn transform_at(&self, timestamp: u64) -> Option<Transform> {
        match &self.transform {
            FrameTransform::Root => Some(Transform::identity()),
            FrameTransform::Static(tf) => Some(*tf),
            FrameTransform::Dynamic(history) => history.at(timestamp),
        }
    }
}

/// Tree of named frames, each storing its pose in its parent
#[derive(Debug, Clone)]
pub struct TFTree {
    frames: HashMap<String, Frame>,
    root: String,
    history_capacity: usize,
}

impl TFTree {
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        let mut frames = HashMap::new();
        frames.insert(
            root.clone(),
            Frame {
                parent: None,
                transform: FrameTransform::Root,
            },
        );
        Self {
            frames,
            root,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Samples kept for dynamic frames created afterwards
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn has_frame(&self, name: &str) -> bool {
        self.frames.contains_key(name)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.frames.get(name)?.parent.as_deref()
    }

    fn check_link(&self, parent: &str, child: &str) -> TFResult<()> {
        if !self.frames.contains_key(parent) {
            return Err(TFError::ParentNotFound(parent.to_string()));
        }
        if child == self.root || self.ancestors(parent).iter().any(|f| f == child) {
            return Err(TFError::CycleDetected(child.to_string()));
        }
        Ok(())
    }

    /// Attach or replace a fixed transform
    pub fn add_static_transform(
        &mut self,
        parent: &str,
        child: &str,
        transform: Transform,
    ) -> TFResult<()> {
        self.check_link(parent, child)?;
        self.frames.insert(
            child.to_string(),
            Frame {
                parent: Some(parent.to_string()),
                transform: FrameTransform::Static(transform),
            },
        );
        Ok(())
    }

    /// Record a timestamped transform, creating the frame on first use
    pub fn add_transform(
        &mut self,
        parent: &str,
        child: &str,
        transform: Transform,
        timestamp: u64,
    ) -> TFResult<()> {
        self.check_link(parent, child)?;
        let capacity = self.history_capacity;
        let frame = self.frames.entry(child.to_string()).or_insert_with(|| Frame {
            parent: Some(parent.to_string()),
            transform: FrameTransform::Dynamic(TransformHistory::new(capacity)),
        });

        frame.parent = Some(parent.to_string());
        match &mut frame.transform {
            FrameTransform::Dynamic(history) => history.push(timestamp, transform),
            other => {
                let mut history = TransformHistory::new(capacity);
                history.push(timestamp, transform);
                *other = FrameTransform::Dynamic(history);
            }
        }
        Ok(())
    }

    /// Pose of `target` expressed in `source`
    ///
    /// The result maps `target` coordinates into `source` coordinates.
    /// Dynamic frames are interpolated at `timestamp`.
    pub fn lookup_transform(
        &self,
        source: &str,
        target: &str,
        timestamp: u64,
    ) -> TFResult<Transform> {
        for name in [source, target] {
            if !self.frames.contains_key(name) {
                return Err(TFError::FrameNotFound(name.to_string()));
            }
        }
        if source == target {
            return Ok(Transform::identity());
        }

        let source_path = self.ancestors(source);
        let target_path = self.ancestors(target);
        let (i, j) = source_path
            .iter()
            .enumerate()
            .find_map(|(i, s)| target_path.iter().position(|t| t == s).map(|j| (i, j)))
            .ok_or_else(|| TFError::NoCommonAncestor(source.to_string(), target.to_string()))?;

        let pose = |name: &String| {
            self.frames
                .get(name)
                .and_then(|f| f.transform_at(timestamp))
                .ok_or_else(|| TFError::TransformNotAvailable(name.clone(), timestamp))
        };

        // Up from the source to the common ancestor, then down to the target
        let mut result = Transform::identity();
        for name in &source_path[..i] {
            result = result.compose(&pose(name)?.inverse());
        }
        for name in target_path[..j].iter().rev() {
            result = result.compose(&pose(name)?);
        }
        Ok(result)
    }

    pub fn lookup_latest_transform(&self, source: &str, target: &str) -> TFResult<Transform> {
        self.lookup_transform(source, target, u64::MAX)
    }

    pub fn can_transform(&self, source: &str, target: &str) -> bool {
        self.lookup_latest_transform(source, target).is_ok()
    }

    /// Frames from `name` up to the root, inclusive
    fn ancestors(&self, name: &str) -> Vec<String> {
        let mut chain = vec![name.to_string()];
        let mut current = self.frames.get(name).and_then(|f| f.parent.clone());
        while let Some(parent) = current {
            if chain.contains(&parent) {
                break;
            }
            current = self.frames.get(&parent).and_then(|f| f.parent.clone());
            chain.push(parent);
        }
        chain
    }

    /// Frame names from `name` up to the root
    pub fn frame_chain(&self, name: &str) -> TFResult<Vec<String>> {
        if !self.frames.contains_key(name) {
            return Err(TFError::FrameNotFound(name.to_string()));
        }
        Ok(self.ancestors(name))
    }
}
