//! Diagnostics for the page runtime
//!
//! Components log through the `log` facade with a per-category target.
//! [`DebugConfig`] decides which categories and levels reach stderr once the
//! binary installs a [`StderrLogger`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEBUG_ENV: &str = "PIXELFOLIO_DEBUG";

/// Debug log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Every tick and timer
    Trace,
    /// Step-by-step progress
    Debug,
    Info,
    /// Fail-open diagnostics
    Warn,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// Debug log category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebugCategory {
    /// Transition sequencer steps
    Sequencer,
    /// Sound effects and synthesis
    Audio,
    /// Frame preloading
    Assets,
    /// Background melody loop
    Music,
    /// Page wiring (buttons, keys, lightbox)
    Shell,
}

impl DebugCategory {
    pub const ALL: [DebugCategory; 5] = [
        DebugCategory::Sequencer,
        DebugCategory::Audio,
        DebugCategory::Assets,
        DebugCategory::Music,
        DebugCategory::Shell,
    ];

    /// `log` target used for this category
    pub fn target(self) -> &'static str {
        match self {
            DebugCategory::Sequencer => "pixelfolio::sequencer",
            DebugCategory::Audio => "pixelfolio::audio",
            DebugCategory::Assets => "pixelfolio::assets",
            DebugCategory::Music => "pixelfolio::music",
            DebugCategory::Shell => "pixelfolio::shell",
        }
    }

    pub fn from_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.target() == target)
    }
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Show debug and trace output; warnings are always shown
    pub enabled: bool,
    /// Minimum level shown while enabled
    pub level: LogLevel,
    /// Categories shown while enabled
    pub categories: HashSet<DebugCategory>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let mut categories = HashSet::new();
        categories.insert(DebugCategory::Sequencer);
        categories.insert(DebugCategory::Assets);

        Self {
            enabled: std::env::var(DEBUG_ENV).is_ok(),
            level: LogLevel::Debug,
            categories,
        }
    }
}

impl DebugConfig {
    /// Everything, at trace level
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Trace,
            categories: DebugCategory::ALL.into_iter().collect(),
        }
    }

    /// Whether a record at `level` for `target` should be printed
    pub fn allows(&self, target: &str, level: log::Level) -> bool {
        if level <= log::Level::Warn {
            return true;
        }
        if !self.enabled || level > log::LevelFilter::from(self.level) {
            return false;
        }
        match DebugCategory::from_target(target) {
            Some(category) => self.categories.contains(&category),
            None => false,
        }
    }

    fn max_level(&self) -> log::LevelFilter {
        if self.enabled {
            self.level.min(LogLevel::Warn).into()
        } else {
            log::LevelFilter::Warn
        }
    }
}

/// `log` backend writing `[LEVEL] category message` lines to stderr
pub struct StderrLogger {
    config: DebugConfig,
}

impl StderrLogger {
    pub fn new(config: DebugConfig) -> Self {
        Self { config }
    }

    /// Install as the global logger
    pub fn install(config: DebugConfig) -> Result<(), log::SetLoggerError> {
        let max_level = config.max_level();
        log::set_boxed_logger(Box::new(Self::new(config)))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.config.allows(metadata.target(), metadata.level())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let category = record
            .target()
            .strip_prefix("pixelfolio::")
            .unwrap_or(record.target());
        eprintln!("[{}] {:10} {}", record.level(), category, record.args());
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_config_default() {
        let config = DebugConfig::default();
        assert!(!config.enabled || std::env::var(DEBUG_ENV).is_ok());
        assert!(config.categories.contains(&DebugCategory::Sequencer));
    }

    #[test]
    fn warnings_pass_even_when_disabled() {
        let config = DebugConfig {
            enabled: false,
            ..DebugConfig::verbose()
        };
        assert!(config.allows(DebugCategory::Audio.target(), log::Level::Warn));
        assert!(!config.allows(DebugCategory::Audio.target(), log::Level::Debug));
    }

    #[test]
    fn categories_filter_debug_output() {
        let config = DebugConfig {
            enabled: true,
            level: LogLevel::Debug,
            categories: [DebugCategory::Sequencer].into_iter().collect(),
        };
        assert!(config.allows(DebugCategory::Sequencer.target(), log::Level::Debug));
        assert!(!config.allows(DebugCategory::Music.target(), log::Level::Debug));
        assert!(!config.allows(DebugCategory::Sequencer.target(), log::Level::Trace));
        assert!(!config.allows("hyper::client", log::Level::Info));
    }

    #[test]
    fn targets_round_trip_to_categories() {
        for category in DebugCategory::ALL {
            assert_eq!(DebugCategory::from_target(category.target()), Some(category));
        }
    }
}
