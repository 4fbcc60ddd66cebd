//! Procedural audio: tone presets, the software synthesizer, sound effects
//! and the background melody loop.
//!
//! Every sound in the page is a generated waveform handed to a [`ToneSink`].
//! The single output is shared by hover/click effects, the slash effect and
//! the melody; sinks mix concurrent tones, nothing arbitrates between them.

pub mod effects;
pub mod music;
pub mod presets;
pub mod synth;
pub mod wav;

use crate::error::AudioError;
use crate::types::ToneSpec;

pub use effects::{EffectLevels, SoundEffects};
pub use music::{BackgroundMusic, MusicSettings};
pub use synth::{SoftwareSynth, render_tone};

/// Identifies one emitted tone so it can be silenced early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToneHandle(pub u64);

/// Audio output destination
pub trait ToneSink: Send + Sync {
    /// Make sure the output is ready. Fails when audio is unavailable or
    /// blocked until the user interacts with the page.
    fn resume(&self) -> Result<(), AudioError> {
        Ok(())
    }

    /// Schedule `tone` to start `tone.start_offset_ms` from now
    fn emit(&self, tone: &ToneSpec) -> Result<ToneHandle, AudioError>;

    /// Stop a tone that may still be sounding
    fn silence(&self, handle: ToneHandle);

    fn silence_all(&self);
}

/// Sink for hosts without any audio output
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ToneSink for NullSink {
    fn resume(&self) -> Result<(), AudioError> {
        Err(AudioError::unavailable("no audio output"))
    }

    fn emit(&self, _tone: &ToneSpec) -> Result<ToneHandle, AudioError> {
        Err(AudioError::unavailable("no audio output"))
    }

    fn silence(&self, _handle: ToneHandle) {}

    fn silence_all(&self) {}
}
