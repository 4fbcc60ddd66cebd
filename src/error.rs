//! Error types for each seam of the page runtime
//!
//! None of these are fatal to the intro sequence; the sequencer routes every
//! one of them through [`crate::runtime::fail_open`].

use crate::types::{FrameId, VisualChange};
use thiserror::Error;

/// Failure to load a frame image
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssetError {
    #[error("Frame '{frame}' not found at {path}")]
    NotFound { frame: FrameId, path: String },

    #[error("Failed to read frame '{frame}': {message}")]
    Io { frame: FrameId, message: String },

    #[error("Frame '{frame}' is empty")]
    Empty { frame: FrameId },
}

impl AssetError {
    pub fn io(frame: impl Into<FrameId>, message: impl Into<String>) -> Self {
        Self::Io {
            frame: frame.into(),
            message: message.into(),
        }
    }
}

/// Failure in the audio subsystem or in a single synthesis call
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    #[error("Audio output unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Invalid tone: {reason}")]
    InvalidTone { reason: String },

    #[error("Synthesis failed: {reason}")]
    Synthesis { reason: String },
}

impl AudioError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn invalid_tone(reason: impl Into<String>) -> Self {
        Self::InvalidTone {
            reason: reason.into(),
        }
    }
}

/// Failure to apply a visual change or to navigate
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Visual change rejected: {change}")]
    Rejected { change: VisualChange },

    #[error("Navigation to '{target}' failed: {reason}")]
    Navigation { target: String, reason: String },
}

/// Script table validation failure
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Script has no steps")]
    Empty,

    #[error("Step '{step}' has an invalid tone: {source}")]
    InvalidTone {
        step: String,
        #[source]
        source: AudioError,
    },
}

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
