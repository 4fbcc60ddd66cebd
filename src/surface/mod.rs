//! Targets for visual state changes
//!
//! A [`Surface`] is whatever displays the page: it receives visual changes,
//! owns the trigger control's enabled state and performs the final
//! navigation.

pub mod recording;
pub mod terminal;

use crate::error::SurfaceError;
use crate::types::VisualChange;

pub use recording::RecordingSurface;
pub use terminal::TerminalSurface;

pub trait Surface: Send + Sync {
    fn apply(&self, change: &VisualChange) -> Result<(), SurfaceError>;

    /// Enable or disable pointer interaction with the trigger control
    fn set_trigger_enabled(&self, enabled: bool);

    fn trigger_enabled(&self) -> bool;

    /// Leave the page for `target`
    fn navigate(&self, target: &str) -> Result<(), SurfaceError>;
}
