//! Frame image loading and best-effort preloading

pub mod filesystem;
pub mod memory;

use crate::error::AssetError;
use crate::runtime::debug::DebugCategory;
use crate::types::FrameId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

pub use filesystem::FileSystemAssetLoader;
pub use memory::MemoryAssetLoader;

/// A frame that finished loading; content is never inspected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFrame {
    pub frame: FrameId,
    pub bytes: usize,
}

/// Source of frame images
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load(&self, frame: &FrameId) -> Result<LoadedFrame, AssetError>;
}

/// Outcome of a preload pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadReport {
    pub loaded: Vec<FrameId>,
    pub failed: Vec<FrameId>,
    /// Frames still loading when the time budget ran out
    pub timed_out: Vec<FrameId>,
}

impl PreloadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.timed_out.is_empty()
    }
}

/// Load every frame concurrently, waiting at most `budget` for all of them.
///
/// Never fails: broken frames and frames that miss the budget are logged and
/// reported, the caller proceeds with whatever loaded.
pub async fn preload(
    loader: Arc<dyn AssetLoader>,
    frames: &[FrameId],
    budget: Duration,
) -> PreloadReport {
    let mut tasks = JoinSet::new();
    for frame in frames {
        let loader = Arc::clone(&loader);
        let frame = frame.clone();
        tasks.spawn(async move {
            let result = loader.load(&frame).await;
            (frame, result)
        });
    }

    let mut report = PreloadReport::default();
    let collect = async {
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((frame, Ok(_))) => report.loaded.push(frame),
                Ok((frame, Err(err))) => {
                    log::warn!(target: DebugCategory::Assets.target(), "{err}");
                    report.failed.push(frame);
                }
                Err(err) => {
                    log::warn!(target: DebugCategory::Assets.target(), "Preload task failed: {err}");
                }
            }
        }
    };

    if tokio::time::timeout(budget, collect).await.is_err() {
        tasks.abort_all();
        report.timed_out = frames
            .iter()
            .filter(|f| !report.loaded.contains(f) && !report.failed.contains(f))
            .cloned()
            .collect();
        log::warn!(
            target: DebugCategory::Assets.target(),
            "Preload budget of {}ms exhausted, {} frame(s) still loading",
            budget.as_millis(),
            report.timed_out.len()
        );
    }

    if !report.is_complete() {
        log::warn!(
            target: DebugCategory::Assets.target(),
            "Some images failed to load, continuing anyway"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames() -> Vec<FrameId> {
        ["frame1", "frame2", "frame3"].into_iter().map(FrameId::from).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn all_frames_load() {
        let loader = Arc::new(MemoryAssetLoader::with_frames(&frames()));
        let report = preload(loader, &frames(), Duration::from_secs(3)).await;
        assert_eq!(report.loaded.len(), 3);
        assert!(report.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn broken_frame_is_reported_not_fatal() {
        let loader = Arc::new(MemoryAssetLoader::with_frames(&frames()).failing("frame2"));
        let report = preload(loader, &frames(), Duration::from_secs(3)).await;
        assert_eq!(report.loaded.len(), 2);
        assert_eq!(report.failed, vec![FrameId::from("frame2")]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_frame_times_out_within_budget() {
        let loader = Arc::new(
            MemoryAssetLoader::with_frames(&frames()).delayed("frame3", Duration::from_secs(60)),
        );
        let start = tokio::time::Instant::now();
        let report = preload(loader, &frames(), Duration::from_millis(500)).await;

        assert_eq!(start.elapsed(), Duration::from_millis(500));
        assert_eq!(report.loaded.len(), 2);
        assert_eq!(report.timed_out, vec![FrameId::from("frame3")]);
    }
}
