//! Surface that records every change with its time

use super::Surface;
use crate::error::SurfaceError;
use crate::types::VisualChange;
use std::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
struct Recorded {
    changes: Vec<(u64, VisualChange)>,
    navigations: Vec<(u64, String)>,
    trigger_enabled: bool,
    /// Every transition of the trigger state, in order
    trigger_history: Vec<(u64, bool)>,
}

/// Headless surface keeping `(elapsed_ms, change)` pairs
#[derive(Debug)]
pub struct RecordingSurface {
    origin: Instant,
    rejected: Vec<VisualChange>,
    navigation_blocked: bool,
    state: Mutex<Recorded>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            rejected: Vec::new(),
            navigation_blocked: false,
            state: Mutex::new(Recorded {
                changes: Vec::new(),
                navigations: Vec::new(),
                trigger_enabled: true,
                trigger_history: Vec::new(),
            }),
        }
    }

    /// Refuse to apply `change`, as if its element were broken
    pub fn rejecting(mut self, change: VisualChange) -> Self {
        self.rejected.push(change);
        self
    }

    /// Refuse every navigation
    pub fn blocking_navigation(mut self) -> Self {
        self.navigation_blocked = true;
        self
    }

    fn elapsed_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    pub fn changes(&self) -> Vec<(u64, VisualChange)> {
        self.state
            .lock()
            .map(|s| s.changes.clone())
            .unwrap_or_default()
    }

    pub fn navigations(&self) -> Vec<(u64, String)> {
        self.state
            .lock()
            .map(|s| s.navigations.clone())
            .unwrap_or_default()
    }

    pub fn trigger_history(&self) -> Vec<(u64, bool)> {
        self.state
            .lock()
            .map(|s| s.trigger_history.clone())
            .unwrap_or_default()
    }

    /// Time at which `change` was first applied
    pub fn applied_at(&self, change: &VisualChange) -> Option<u64> {
        self.changes()
            .into_iter()
            .find(|(_, c)| c == change)
            .map(|(at, _)| at)
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn apply(&self, change: &VisualChange) -> Result<(), SurfaceError> {
        if self.rejected.contains(change) {
            return Err(SurfaceError::Rejected {
                change: change.clone(),
            });
        }
        let at = self.elapsed_ms();
        if let Ok(mut state) = self.state.lock() {
            state.changes.push((at, change.clone()));
        }
        Ok(())
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        let at = self.elapsed_ms();
        if let Ok(mut state) = self.state.lock()
            && state.trigger_enabled != enabled
        {
            state.trigger_enabled = enabled;
            state.trigger_history.push((at, enabled));
        }
    }

    fn trigger_enabled(&self) -> bool {
        self.state.lock().map(|s| s.trigger_enabled).unwrap_or(false)
    }

    fn navigate(&self, target: &str) -> Result<(), SurfaceError> {
        if self.navigation_blocked {
            return Err(SurfaceError::Navigation {
                target: target.to_string(),
                reason: "navigation blocked".to_string(),
            });
        }
        let at = self.elapsed_ms();
        if let Ok(mut state) = self.state.lock() {
            state.navigations.push((at, target.to_string()));
        }
        Ok(())
    }
}
