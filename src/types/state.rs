//! Transient sequencer state

use serde::{Deserialize, Serialize};

/// State of one sequencer run. Created when the trigger fires, discarded
/// once the page navigates away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequencerState {
    /// Index of the step currently holding (or about to run)
    pub step_index: usize,
    /// Whether a run is in progress
    pub running: bool,
    /// Whether the last run reached its completion callback
    pub completed: bool,
}

impl SequencerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state for a run that just started
    pub fn started() -> Self {
        Self {
            step_index: 0,
            running: true,
            completed: false,
        }
    }
}

/// How a call to [`crate::runtime::Sequencer::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every step elapsed and the completion callback fired
    Completed,
    /// Another run was in progress; this call did nothing
    AlreadyRunning,
    /// Cancelled at a suspension point; the callback did not fire
    Cancelled,
}
