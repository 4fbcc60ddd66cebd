//! In-memory frame source with scriptable failures and delays

use super::{AssetLoader, LoadedFrame};
use crate::error::AssetError;
use crate::types::FrameId;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct MemoryAssetLoader {
    frames: HashMap<FrameId, Vec<u8>>,
    failing: HashSet<FrameId>,
    delays: HashMap<FrameId, Duration>,
}

impl MemoryAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader holding a small placeholder image for each frame
    pub fn with_frames(frames: &[FrameId]) -> Self {
        let mut loader = Self::new();
        for frame in frames {
            loader.insert(frame.clone(), vec![0x89, b'P', b'N', b'G']);
        }
        loader
    }

    pub fn insert(&mut self, frame: FrameId, bytes: Vec<u8>) {
        self.frames.insert(frame, bytes);
    }

    /// Make loading `frame` fail
    pub fn failing(mut self, frame: impl Into<FrameId>) -> Self {
        self.failing.insert(frame.into());
        self
    }

    /// Make loading `frame` take `delay`
    pub fn delayed(mut self, frame: impl Into<FrameId>, delay: Duration) -> Self {
        self.delays.insert(frame.into(), delay);
        self
    }
}

#[async_trait]
impl AssetLoader for MemoryAssetLoader {
    async fn load(&self, frame: &FrameId) -> Result<LoadedFrame, AssetError> {
        if let Some(delay) = self.delays.get(frame) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(frame) {
            return Err(AssetError::io(frame.clone(), "simulated load failure"));
        }
        match self.frames.get(frame) {
            Some(bytes) if bytes.is_empty() => Err(AssetError::Empty {
                frame: frame.clone(),
            }),
            Some(bytes) => Ok(LoadedFrame {
                frame: frame.clone(),
                bytes: bytes.len(),
            }),
            None => Err(AssetError::NotFound {
                frame: frame.clone(),
                path: "memory".to_string(),
            }),
        }
    }
}
