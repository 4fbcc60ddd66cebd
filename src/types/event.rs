//! Timeline records of what the sequencer did and when

use crate::types::{VisualChange, Waveform};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Something observable the sequencer did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SequencerEvent {
    TriggerDisabled,
    TriggerEnabled,
    PreloadFinished {
        loaded: usize,
        failed: usize,
        timed_out: usize,
    },
    StepStarted {
        index: usize,
        name: String,
    },
    Visual {
        change: VisualChange,
    },
    VisualFailed {
        change: VisualChange,
        reason: String,
    },
    ToneEmitted {
        waveform: Waveform,
        start_offset_ms: f64,
    },
    ToneFailed {
        waveform: Waveform,
        reason: String,
    },
    Completed,
    Cancelled,
}

/// An event stamped with milliseconds since the timeline was created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: SequencerEvent,
}

/// Shared, append-only record of sequencer events.
///
/// Cloning yields another handle to the same record.
#[derive(Debug, Clone)]
pub struct Timeline {
    origin: Instant,
    events: Arc<Mutex<Vec<TimedEvent>>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    pub fn record(&self, event: SequencerEvent) {
        let at_ms = self.elapsed_ms();
        if let Ok(mut events) = self.events.lock() {
            events.push(TimedEvent { at_ms, event });
        }
    }

    pub fn events(&self) -> Vec<TimedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Timestamps of every visual change that was applied
    pub fn visuals(&self) -> Vec<(u64, VisualChange)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e.event {
                SequencerEvent::Visual { change } => Some((e.at_ms, change)),
                _ => None,
            })
            .collect()
    }

    /// Time of the first event matching `pred`
    pub fn first_at(&self, pred: impl Fn(&SequencerEvent) -> bool) -> Option<u64> {
        self.events()
            .into_iter()
            .find(|e| pred(&e.event))
            .map(|e| e.at_ms)
    }

    pub fn count(&self, pred: impl Fn(&SequencerEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(&e.event)).count()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
