//! The step table driven by the sequencer

use crate::audio::presets;
use crate::error::ScriptError;
use crate::types::{FrameId, ToneSpec, VisualChange};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One phase of the sequence: visual changes and sounds fired at its start,
/// then a hold of `duration_ms` before the next step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub actions: Vec<VisualChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sounds: Vec<ToneSpec>,
    pub duration_ms: u64,
}

impl Step {
    pub fn new(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            sounds: Vec::new(),
            duration_ms,
        }
    }

    pub fn action(mut self, change: VisualChange) -> Self {
        self.actions.push(change);
        self
    }

    pub fn sounds(mut self, tones: impl IntoIterator<Item = ToneSpec>) -> Self {
        self.sounds.extend(tones);
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Ordered, statically defined list of steps plus the frames to preload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub frames: Vec<FrameId>,
    pub steps: Vec<Step>,
}

impl Script {
    /// The character intro: fade in, draw, slash, white flash
    pub fn transition() -> Self {
        let frame1 = FrameId::from("frame1");
        let frame2 = FrameId::from("frame2");
        let frame3 = FrameId::from("frame3");

        let steps = vec![
            Step::new("lead-in", 100)
                .action(VisualChange::OverlayInserted {
                    frame: frame1.clone(),
                })
                .action(VisualChange::OverlayActivated),
            Step::new("fade-in", 900).action(VisualChange::FadeInStarted),
            Step::new("draw", 800)
                .action(VisualChange::Settled)
                .action(VisualChange::FrameSwapped {
                    frame: frame2.clone(),
                }),
            Step::new("slash", 600)
                .action(VisualChange::FrameSwapped {
                    frame: frame3.clone(),
                })
                .action(VisualChange::SlashMarked)
                .sounds(presets::slash()),
            Step::new("flash", 50).action(VisualChange::FlashInserted),
            Step::new("flash-hold", 1000).action(VisualChange::FlashActivated),
        ];

        Self {
            frames: vec![frame1, frame2, frame3],
            steps,
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(Step::duration).sum()
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.steps.is_empty() {
            return Err(ScriptError::Empty);
        }
        for step in &self.steps {
            for tone in &step.sounds {
                tone.validate().map_err(|source| ScriptError::InvalidTone {
                    step: step.name.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Offset of each step's start from the beginning of the table
    pub fn step_offsets(&self) -> Vec<u64> {
        self.steps
            .iter()
            .scan(0u64, |elapsed, step| {
                let start = *elapsed;
                *elapsed += step.duration_ms;
                Some(start)
            })
            .collect()
    }
}
