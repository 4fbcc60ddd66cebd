//! Runtime configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all) is
//! a valid configuration.

use crate::audio::MusicSettings;
use crate::audio::synth::DEFAULT_SAMPLE_RATE;
use crate::error::ConfigError;
use crate::runtime::debug::{DEBUG_ENV, DebugConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `images/frame1.png` and friends
    pub assets_dir: PathBuf,
    /// Page opened once the transition completes
    pub navigate_to: String,
    pub preload_timeout_ms: u64,
    /// Pause between the start click and the transition
    pub start_delay_ms: u64,
    pub sample_rate: u32,
    pub music: MusicSettings,
    pub debug: DebugConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("."),
            navigate_to: "main.html".to_string(),
            preload_timeout_ms: 3000,
            start_delay_ms: 500,
            sample_rate: DEFAULT_SAMPLE_RATE,
            music: MusicSettings::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file. `PIXELFOLIO_DEBUG` in the environment turns
    /// debug output on regardless of the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let mut config: Config = serde_json::from_str(&text).map_err(|source| {
            ConfigError::Parse {
                path: display,
                source,
            }
        })?;
        if std::env::var(DEBUG_ENV).is_ok() {
            config.debug.enabled = true;
        }
        Ok(config)
    }

    pub fn preload_timeout(&self) -> Duration {
        Duration::from_millis(self.preload_timeout_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}
