//! Surface printing each change to stdout

use super::Surface;
use crate::error::SurfaceError;
use crate::types::VisualChange;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::Instant;

pub struct TerminalSurface {
    origin: Instant,
    trigger_enabled: AtomicBool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            trigger_enabled: AtomicBool::new(true),
        }
    }

    fn stamp(&self) -> String {
        format!("[{:>6}ms]", self.origin.elapsed().as_millis())
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for TerminalSurface {
    fn apply(&self, change: &VisualChange) -> Result<(), SurfaceError> {
        println!("{} {}", self.stamp(), change);
        Ok(())
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        let previous = self.trigger_enabled.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            let state = if enabled { "enabled" } else { "disabled" };
            println!("{} start button {}", self.stamp(), state);
        }
    }

    fn trigger_enabled(&self) -> bool {
        self.trigger_enabled.load(Ordering::SeqCst)
    }

    fn navigate(&self, target: &str) -> Result<(), SurfaceError> {
        if target.trim().is_empty() {
            return Err(SurfaceError::Navigation {
                target: target.to_string(),
                reason: "empty target".to_string(),
            });
        }
        println!("{} -> {}", self.stamp(), target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_navigation_target_is_refused() {
        let surface = TerminalSurface::new();
        assert!(matches!(
            surface.navigate("  "),
            Err(SurfaceError::Navigation { .. })
        ));
        assert!(surface.navigate("main.html").is_ok());
    }
}
