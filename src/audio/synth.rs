//! Software synthesizer: renders tone envelopes to mono PCM

use super::{ToneHandle, ToneSink};
use crate::error::AudioError;
use crate::types::ToneSpec;
use std::sync::Mutex;
use tokio::time::Instant;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Render a single tone, ignoring its start offset.
///
/// Phase is accumulated sample by sample so frequency sweeps stay continuous.
pub fn render_tone(tone: &ToneSpec, sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f64;
    let len = (tone.duration_ms * rate / 1000.0).round() as usize;
    let mut samples = Vec::with_capacity(len);
    let mut phase = 0.0f64;

    for i in 0..len {
        let t_ms = i as f64 * 1000.0 / rate;
        let value = tone.waveform.sample(phase) * tone.gain.value_at(t_ms);
        samples.push(value as f32);
        phase = (phase + tone.frequency.value_at(t_ms) / rate).fract();
    }

    samples
}

#[derive(Debug, Clone)]
struct Voice {
    handle: ToneHandle,
    start_ms: f64,
    cut_ms: Option<f64>,
    tone: ToneSpec,
}

impl Voice {
    fn end_ms(&self) -> f64 {
        let natural = self.start_ms + self.tone.duration_ms;
        self.cut_ms.map_or(natural, |cut| cut.min(natural))
    }
}

#[derive(Debug, Default)]
struct SynthState {
    next_handle: u64,
    voices: Vec<Voice>,
}

/// [`ToneSink`] that keeps every emitted tone on a shared timebase and mixes
/// them on demand.
///
/// Times are measured on the tokio clock from the moment the synth is
/// created, so a paused test runtime yields exact sample positions.
#[derive(Debug)]
pub struct SoftwareSynth {
    sample_rate: u32,
    origin: Instant,
    state: Mutex<SynthState>,
}

impl SoftwareSynth {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            origin: Instant::now(),
            state: Mutex::new(SynthState::default()),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_micros() as f64 / 1000.0
    }

    /// Every tone emitted so far with its absolute start time in ms
    pub fn emitted(&self) -> Vec<(f64, ToneSpec)> {
        self.state
            .lock()
            .map(|s| s.voices.iter().map(|v| (v.start_ms, v.tone.clone())).collect())
            .unwrap_or_default()
    }

    /// Number of tones still sounding (or scheduled) right now
    pub fn active_count(&self) -> usize {
        let now = self.now_ms();
        self.state
            .lock()
            .map(|s| s.voices.iter().filter(|v| v.end_ms() > now).count())
            .unwrap_or(0)
    }

    /// Mix every voice into one buffer starting at the synth origin
    pub fn mixdown(&self) -> Vec<f32> {
        let voices = match self.state.lock() {
            Ok(state) => state.voices.clone(),
            Err(_) => return Vec::new(),
        };
        let rate = self.sample_rate as f64;
        let total_ms = voices.iter().map(Voice::end_ms).fold(0.0, f64::max);
        let mut mix = vec![0.0f32; (total_ms * rate / 1000.0).ceil() as usize];

        for voice in &voices {
            let start = (voice.start_ms * rate / 1000.0).round() as usize;
            let audible = ((voice.end_ms() - voice.start_ms).max(0.0) * rate / 1000.0) as usize;
            let rendered = render_tone(&voice.tone, self.sample_rate);
            for (offset, sample) in rendered.into_iter().take(audible).enumerate() {
                if let Some(slot) = mix.get_mut(start + offset) {
                    *slot += sample;
                }
            }
        }

        for sample in &mut mix {
            *sample = sample.clamp(-1.0, 1.0);
        }
        mix
    }
}

impl Default for SoftwareSynth {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl ToneSink for SoftwareSynth {
    fn emit(&self, tone: &ToneSpec) -> Result<ToneHandle, AudioError> {
        tone.validate()?;
        let start_ms = self.now_ms() + tone.start_offset_ms;
        let mut state = self.state.lock().map_err(|_| AudioError::Synthesis {
            reason: "synth state poisoned".to_string(),
        })?;
        let handle = ToneHandle(state.next_handle);
        state.next_handle += 1;
        state.voices.push(Voice {
            handle,
            start_ms,
            cut_ms: None,
            tone: tone.clone(),
        });
        Ok(handle)
    }

    fn silence(&self, handle: ToneHandle) {
        let now = self.now_ms();
        if let Ok(mut state) = self.state.lock()
            && let Some(voice) = state.voices.iter_mut().find(|v| v.handle == handle)
            && voice.cut_ms.is_none()
        {
            voice.cut_ms = Some(now);
        }
    }

    fn silence_all(&self) {
        let now = self.now_ms();
        if let Ok(mut state) = self.state.lock() {
            for voice in state.voices.iter_mut().filter(|v| v.cut_ms.is_none()) {
                voice.cut_ms = Some(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::presets;
    use std::time::Duration;

    #[test]
    fn render_length_matches_duration() {
        let tone = presets::click(0.3);
        let samples = render_tone(&tone, 8_000);
        assert_eq!(samples.len(), 800);
        // Square wave starts high at full gain, ends near the decay floor
        assert!((samples[0] - 0.3).abs() < 1e-6);
        assert!(samples[799].abs() < 0.011);
    }

    #[tokio::test(start_paused = true)]
    async fn offsets_place_tones_on_the_timebase() {
        let synth = SoftwareSynth::new(1_000);
        for tone in presets::slash() {
            synth.emit(&tone).unwrap();
        }
        let starts: Vec<f64> = synth.emitted().into_iter().map(|(at, _)| at).collect();
        assert_eq!(starts, vec![0.0, 200.0, 150.0]);

        // Whoosh ends at 300ms, impact at 350ms
        assert_eq!(synth.mixdown().len(), 350);
    }

    #[tokio::test(start_paused = true)]
    async fn silence_cuts_a_voice_short() {
        let synth = SoftwareSynth::new(1_000);
        let handle = synth.emit(&presets::blip(440.0, 0.5, 1000.0)).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(synth.active_count(), 1);

        synth.silence(handle);
        assert_eq!(synth.active_count(), 0);

        let mix = synth.mixdown();
        assert_eq!(mix.len(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn silence_all_leaves_finished_tones_alone() {
        let synth = SoftwareSynth::new(1_000);
        synth.emit(&presets::hover(0.1)).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        synth.emit(&presets::blip(440.0, 0.5, 1000.0)).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        synth.silence_all();
        let emitted = synth.emitted();
        assert_eq!(emitted.len(), 2);
        // Hover tone ran its full 50ms; long tone stopped at 300ms
        assert_eq!(synth.mixdown().len(), 300);
    }

    #[test]
    fn invalid_tone_is_rejected_not_scheduled() {
        let synth = SoftwareSynth::new(1_000);
        let mut tone = presets::click(0.3);
        tone.duration_ms = 0.0;
        assert!(synth.emit(&tone).is_err());
        assert!(synth.emitted().is_empty());
    }
}
