//! Transition sequencer
//!
//! Drives a [`Script`] step by step on the tokio clock: apply the step's
//! visual changes, hand its tones to the audio sink, then hold for the step
//! duration. Steps never overlap; the only concurrency is audio scheduled by
//! the sink while visuals hold.
//!
//! Every side effect is fail-open. Whatever breaks (frames, audio, DOM-like
//! surface calls), the run reaches its completion callback unless it is
//! explicitly cancelled.

use crate::assets::{self, AssetLoader};
use crate::audio::{ToneHandle, ToneSink};
use crate::surface::Surface;
use crate::types::{
    RunOutcome, Script, SequencerEvent, SequencerState, Timeline, ToneSpec, VisualChange,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub mod debug;
pub mod fail_open;


use debug::DebugCategory;
pub use fail_open::{fail_open, fail_open_reported};

/// Default time budget for preloading frames
pub const DEFAULT_PRELOAD_BUDGET: Duration = Duration::from_millis(3000);

/// Requests cancellation of the run in progress.
///
/// Takes effect at the next suspension point. A run started after the
/// request is not affected. [`crate::shell::IntroPage`] also honours it
/// during its start delay.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Forget any earlier request
    pub(crate) fn clear(&self) {
        self.tx.send_replace(false);
    }

    pub(crate) fn watch(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Releases the running flag however the run ends. A run future dropped
/// mid-sequence gets the same cleanup as a cancelled run.
struct RunGuard<'a> {
    sequencer: &'a Sequencer,
    settled: bool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::debug!(target: DebugCategory::Sequencer.target(), "Run abandoned mid-sequence");
            self.sequencer.release();
        }
        self.sequencer.running.store(false, Ordering::SeqCst);
    }
}

pub struct Sequencer {
    script: Script,
    surface: Arc<dyn Surface>,
    tones: Arc<dyn ToneSink>,
    assets: Arc<dyn AssetLoader>,
    preload_budget: Duration,
    timeline: Timeline,
    running: AtomicBool,
    state: Mutex<SequencerState>,
    cancel: Arc<watch::Sender<bool>>,
    /// Tones emitted by the current run
    emitted: Mutex<Vec<ToneHandle>>,
}

impl Sequencer {
    pub fn new(
        script: Script,
        surface: Arc<dyn Surface>,
        tones: Arc<dyn ToneSink>,
        assets: Arc<dyn AssetLoader>,
    ) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            script,
            surface,
            tones,
            assets,
            preload_budget: DEFAULT_PRELOAD_BUDGET,
            timeline: Timeline::new(),
            running: AtomicBool::new(false),
            state: Mutex::new(SequencerState::new()),
            cancel: Arc::new(cancel),
            emitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_preload_budget(mut self, budget: Duration) -> Self {
        self.preload_budget = budget;
        self
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn state(&self) -> SequencerState {
        self.state.lock().map(|s| *s).unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel),
        }
    }

    /// Play the script, then call `on_complete` exactly once.
    ///
    /// While a run is in progress further calls return
    /// [`RunOutcome::AlreadyRunning`] without touching anything.
    pub async fn run<F>(&self, on_complete: F) -> RunOutcome
    where
        F: FnOnce(),
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!(target: DebugCategory::Sequencer.target(), "Trigger ignored, sequence already running");
            return RunOutcome::AlreadyRunning;
        }
        let mut guard = RunGuard {
            sequencer: self,
            settled: false,
        };

        self.cancel.send_replace(false);
        let mut cancelled = self.cancel.subscribe();
        self.update_state(|s| *s = SequencerState::started());
        if let Ok(mut emitted) = self.emitted.lock() {
            emitted.clear();
        }

        self.surface.set_trigger_enabled(false);
        self.timeline.record(SequencerEvent::TriggerDisabled);

        let report = assets::preload(
            Arc::clone(&self.assets),
            &self.script.frames,
            self.preload_budget,
        )
        .await;
        self.timeline.record(SequencerEvent::PreloadFinished {
            loaded: report.loaded.len(),
            failed: report.failed.len(),
            timed_out: report.timed_out.len(),
        });

        for (index, step) in self.script.steps.iter().enumerate() {
            if *cancelled.borrow() {
                guard.settled = true;
                return self.finish_cancelled();
            }
            self.update_state(|s| s.step_index = index);
            self.timeline.record(SequencerEvent::StepStarted {
                index,
                name: step.name.clone(),
            });
            log::debug!(
                target: DebugCategory::Sequencer.target(),
                "[Step {index}] {} ({}ms)",
                step.name,
                step.duration_ms
            );

            for change in &step.actions {
                self.apply(change);
            }
            for tone in &step.sounds {
                self.emit(tone);
            }

            if !hold(&mut cancelled, step.duration()).await {
                guard.settled = true;
                return self.finish_cancelled();
            }
        }

        guard.settled = true;
        self.timeline.record(SequencerEvent::Completed);
        log::info!(target: DebugCategory::Sequencer.target(), "Transition complete");
        on_complete();
        self.update_state(|s| {
            s.step_index = self.script.steps.len();
            s.running = false;
            s.completed = true;
        });
        RunOutcome::Completed
    }

    fn apply(&self, change: &VisualChange) {
        let result = fail_open_reported(
            DebugCategory::Sequencer,
            "visual change",
            self.surface.apply(change),
        );
        let event = match result {
            Ok(()) => SequencerEvent::Visual {
                change: change.clone(),
            },
            Err(reason) => SequencerEvent::VisualFailed {
                change: change.clone(),
                reason,
            },
        };
        self.timeline.record(event);
    }

    fn emit(&self, tone: &ToneSpec) {
        match fail_open_reported(DebugCategory::Audio, "tone", self.tones.emit(tone)) {
            Ok(handle) => {
                if let Ok(mut emitted) = self.emitted.lock() {
                    emitted.push(handle);
                }
                self.timeline.record(SequencerEvent::ToneEmitted {
                    waveform: tone.waveform,
                    start_offset_ms: tone.start_offset_ms,
                });
            }
            Err(reason) => self.timeline.record(SequencerEvent::ToneFailed {
                waveform: tone.waveform,
                reason,
            }),
        }
    }

    fn finish_cancelled(&self) -> RunOutcome {
        self.release();
        self.timeline.record(SequencerEvent::Cancelled);
        log::info!(target: DebugCategory::Sequencer.target(), "Transition cancelled");
        RunOutcome::Cancelled
    }

    /// Undo what an unfinished run left behind: cut its tones, give the
    /// trigger back and mark the state idle
    fn release(&self) {
        let emitted = self
            .emitted
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default();
        for handle in emitted {
            self.tones.silence(handle);
        }
        self.surface.set_trigger_enabled(true);
        self.timeline.record(SequencerEvent::TriggerEnabled);
        self.update_state(|s| s.running = false);
    }

    fn update_state(&self, f: impl FnOnce(&mut SequencerState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }
}

/// Wait for `duration`; false if cancellation was requested first
pub(crate) async fn hold(cancelled: &mut watch::Receiver<bool>, duration: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        Ok(_) = cancelled.wait_for(|c| *c) => false,
    }
}
