//! Looping chiptune background melody
//!
//! Two states, `Stopped` and `Playing`. Starting arms a recurring timer and
//! plays the first note at once; stopping disarms the timer and silences any
//! note still sounding. Emission happens under the state lock, so once
//! [`BackgroundMusic::stop`] returns no further note can fire.

use super::{ToneHandle, ToneSink, presets};
use crate::error::AudioError;
use crate::runtime::debug::DebugCategory;
use crate::runtime::fail_open;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Tempo and loudness of the melody loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicSettings {
    /// Master volume applied to every note
    pub volume: f64,
    /// Note length and tick period
    pub note_ms: u64,
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            volume: 0.08,
            note_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicStatus {
    Stopped,
    Playing,
}

#[derive(Debug)]
struct MusicState {
    status: MusicStatus,
    index: usize,
    /// Notes that may still be sounding, with the instant they end
    active: Vec<(ToneHandle, Instant)>,
}

/// Background melody player. Construct one per page and drop it on unload.
pub struct BackgroundMusic {
    sink: Arc<dyn ToneSink>,
    settings: MusicSettings,
    state: Arc<Mutex<MusicState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundMusic {
    pub fn new(sink: Arc<dyn ToneSink>, settings: MusicSettings) -> Self {
        Self {
            sink,
            settings,
            state: Arc::new(Mutex::new(MusicState {
                status: MusicStatus::Stopped,
                index: 0,
                active: Vec::new(),
            })),
            timer: Mutex::new(None),
        }
    }

    pub fn status(&self) -> MusicStatus {
        self.state
            .lock()
            .map(|s| s.status)
            .unwrap_or(MusicStatus::Stopped)
    }

    pub fn is_playing(&self) -> bool {
        self.status() == MusicStatus::Playing
    }

    /// Index of the next note to play
    pub fn current_index(&self) -> usize {
        self.state.lock().map(|s| s.index).unwrap_or(0)
    }

    /// Start the loop from the first note. No-op while already playing.
    ///
    /// Fails when the audio output refuses to resume (e.g. autoplay blocked)
    /// or when called outside a tokio runtime.
    pub fn start(&self) -> Result<(), AudioError> {
        let runtime = Handle::try_current()
            .map_err(|_| AudioError::unavailable("no async runtime to drive the melody timer"))?;

        {
            let mut state = self.lock_state()?;
            if state.status == MusicStatus::Playing {
                return Ok(());
            }
            self.sink.resume()?;
            state.status = MusicStatus::Playing;
            state.index = 0;
        }

        log::info!(target: DebugCategory::Music.target(), "Background music started");
        play_tick(&self.state, self.sink.as_ref(), &self.settings);

        let period = Duration::from_millis(self.settings.note_ms.max(1));
        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);
        let settings = self.settings;
        let timer = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if !play_tick(&state, sink.as_ref(), &settings) {
                    break;
                }
            }
        });

        if let Ok(mut slot) = self.timer.lock()
            && let Some(previous) = slot.replace(timer)
        {
            previous.abort();
        }
        Ok(())
    }

    /// Stop the loop and silence every note still sounding
    pub fn stop(&self) {
        let active = match self.state.lock() {
            Ok(mut state) => {
                state.status = MusicStatus::Stopped;
                std::mem::take(&mut state.active)
            }
            Err(_) => Vec::new(),
        };

        if let Ok(mut slot) = self.timer.lock()
            && let Some(timer) = slot.take()
        {
            timer.abort();
        }

        let now = Instant::now();
        for (handle, ends_at) in active {
            if ends_at > now {
                self.sink.silence(handle);
            }
        }
        log::info!(target: DebugCategory::Music.target(), "Background music stopped");
    }

    /// Invert the current state, returning whether music is now playing
    pub fn toggle(&self) -> Result<bool, AudioError> {
        if self.is_playing() {
            self.stop();
            Ok(false)
        } else {
            self.start()?;
            Ok(true)
        }
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, MusicState>, AudioError> {
        self.state.lock().map_err(|_| AudioError::Synthesis {
            reason: "music state poisoned".to_string(),
        })
    }
}

impl Drop for BackgroundMusic {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.timer.lock()
            && let Some(timer) = slot.take()
        {
            timer.abort();
        }
    }
}

/// Emit the lead and bass note at the current index and advance.
/// Returns false once the player has been stopped.
fn play_tick(state: &Mutex<MusicState>, sink: &dyn ToneSink, settings: &MusicSettings) -> bool {
    let Ok(mut state) = state.lock() else {
        return false;
    };
    if state.status != MusicStatus::Playing {
        return false;
    }

    let now = Instant::now();
    state.active.retain(|(_, ends_at)| *ends_at > now);

    let note_ms = settings.note_ms as f64;
    let ends_at = now + Duration::from_millis(settings.note_ms);
    let index = state.index;
    let voices = [
        presets::melody_note(presets::MELODY[index], false, settings.volume, note_ms),
        presets::melody_note(presets::BASS[index], true, settings.volume, note_ms),
    ];
    for tone in &voices {
        if let Some(handle) = fail_open(DebugCategory::Music, "melody note", sink.emit(tone)) {
            state.active.push((handle, ends_at));
        }
    }

    log::trace!(target: DebugCategory::Music.target(), "Played melody note {index}");
    state.index = (index + 1) % presets::MELODY.len();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullSink, SoftwareSynth};

    fn lead_starts(synth: &SoftwareSynth) -> Vec<f64> {
        synth
            .emitted()
            .into_iter()
            .filter(|(_, tone)| tone.frequency.value_at(0.0) > 400.0)
            .map(|(at, _)| at)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn notes_fire_every_300ms() {
        let synth = Arc::new(SoftwareSynth::new(8_000));
        let music = BackgroundMusic::new(synth.clone(), MusicSettings::default());

        music.start().unwrap();
        tokio::time::sleep(Duration::from_millis(950)).await;

        assert_eq!(lead_starts(&synth), vec![0.0, 300.0, 600.0, 900.0]);
        // Lead and bass per tick
        assert_eq!(synth.emitted().len(), 8);
        assert_eq!(music.current_index(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn pattern_wraps_after_sixteen_notes() {
        let synth = Arc::new(SoftwareSynth::new(8_000));
        let music = BackgroundMusic::new(synth.clone(), MusicSettings::default());

        music.start().unwrap();
        tokio::time::sleep(Duration::from_millis(16 * 300 + 50)).await;

        let leads: Vec<f64> = synth
            .emitted()
            .into_iter()
            .filter(|(_, tone)| tone.frequency.value_at(0.0) > 400.0)
            .map(|(_, tone)| tone.frequency.value_at(0.0))
            .collect();
        assert_eq!(leads.len(), 17);
        assert_eq!(leads[16], presets::MELODY[0]);
        assert_eq!(music.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_emission_and_silences() {
        let synth = Arc::new(SoftwareSynth::new(8_000));
        let music = BackgroundMusic::new(synth.clone(), MusicSettings::default());

        music.start().unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;
        music.stop();
        assert!(!music.is_playing());
        assert_eq!(synth.active_count(), 0);

        let emitted = synth.emitted().len();
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(synth.emitted().len(), emitted);
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_playing_does_not_restart() {
        let synth = Arc::new(SoftwareSynth::new(8_000));
        let music = BackgroundMusic::new(synth.clone(), MusicSettings::default());

        music.start().unwrap();
        tokio::time::sleep(Duration::from_millis(350)).await;
        music.start().unwrap();
        assert_eq!(music.current_index(), 2);
        assert_eq!(synth.emitted().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_flips_state_and_restarts_from_first_note() {
        let synth = Arc::new(SoftwareSynth::new(8_000));
        let music = BackgroundMusic::new(synth.clone(), MusicSettings::default());

        assert!(music.toggle().unwrap());
        tokio::time::sleep(Duration::from_millis(650)).await;
        assert!(!music.toggle().unwrap());
        assert_eq!(music.current_index(), 3);

        assert!(music.toggle().unwrap());
        assert_eq!(music.current_index(), 1);
        music.stop();
    }

    #[tokio::test]
    async fn start_fails_when_audio_is_unavailable() {
        let music = BackgroundMusic::new(Arc::new(NullSink), MusicSettings::default());
        assert!(matches!(
            music.start(),
            Err(AudioError::Unavailable { .. })
        ));
        assert_eq!(music.status(), MusicStatus::Stopped);
    }

    #[test]
    fn start_outside_runtime_is_an_error() {
        let music = BackgroundMusic::new(Arc::new(SoftwareSynth::default()), MusicSettings::default());
        assert!(music.start().is_err());
        assert!(!music.is_playing());
    }
}
