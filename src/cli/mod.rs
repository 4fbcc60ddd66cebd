//! Command-line front ends

pub mod play;
pub mod render;

use crate::config::Config;
use std::path::Path;

/// Load `path` when given, otherwise fall back to defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}

/// Transition script as pretty-printed JSON
pub fn script_json() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&crate::types::Script::transition())?)
}
