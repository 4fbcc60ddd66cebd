//! Frame loading from an assets directory on disk

use super::{AssetLoader, LoadedFrame};
use crate::error::AssetError;
use crate::types::FrameId;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads `<base>/images/<frame>.png`
#[derive(Debug, Clone)]
pub struct FileSystemAssetLoader {
    base_path: PathBuf,
}

impl FileSystemAssetLoader {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn frame_path(&self, frame: &FrameId) -> PathBuf {
        self.base_path.join(frame.image_path())
    }
}

#[async_trait]
impl AssetLoader for FileSystemAssetLoader {
    async fn load(&self, frame: &FrameId) -> Result<LoadedFrame, AssetError> {
        let path = self.frame_path(frame);
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound {
                    frame: frame.clone(),
                    path: path.display().to_string(),
                }
            } else {
                AssetError::io(frame.clone(), e.to_string())
            }
        })?;

        if bytes.is_empty() {
            return Err(AssetError::Empty {
                frame: frame.clone(),
            });
        }

        Ok(LoadedFrame {
            frame: frame.clone(),
            bytes: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_frames_from_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/frame1.png"), b"\x89PNG").unwrap();
        std::fs::write(dir.path().join("images/frame2.png"), b"").unwrap();

        let loader = FileSystemAssetLoader::new(dir.path());

        let loaded = loader.load(&FrameId::from("frame1")).await.unwrap();
        assert_eq!(loaded.bytes, 4);

        assert!(matches!(
            loader.load(&FrameId::from("frame2")).await,
            Err(AssetError::Empty { .. })
        ));
        assert!(matches!(
            loader.load(&FrameId::from("frame3")).await,
            Err(AssetError::NotFound { .. })
        ));
    }
}
