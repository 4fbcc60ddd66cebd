//! Offline rendering of the page's sounds to WAV

use crate::audio::wav::write_wav;
use crate::audio::{MusicSettings, SoftwareSynth, ToneSink, presets};
use crate::types::ToneSpec;
use std::path::Path;

/// What to put in the rendered file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderTarget {
    /// The three slash tones
    Slash,
    /// The first `ticks` notes of the melody loop, lead and bass
    Melody { ticks: usize, settings: MusicSettings },
}

/// Tones for `target`, offsets relative to the start of the file
pub fn tones(target: RenderTarget) -> Vec<ToneSpec> {
    match target {
        RenderTarget::Slash => presets::slash().to_vec(),
        RenderTarget::Melody { ticks, settings } => {
            let note_ms = settings.note_ms as f64;
            (0..ticks)
                .flat_map(|tick| {
                    let index = tick % presets::MELODY.len();
                    let offset = tick as f64 * note_ms;
                    [
                        (presets::MELODY[index], false),
                        (presets::BASS[index], true),
                    ]
                    .map(|(freq, is_bass)| ToneSpec {
                        start_offset_ms: offset,
                        ..presets::melody_note(freq, is_bass, settings.volume, note_ms)
                    })
                })
                .collect()
        }
    }
}

/// Mix `target` and write it to `out`, returning the number of samples
pub fn run_render(out: &Path, target: RenderTarget, sample_rate: u32) -> anyhow::Result<usize> {
    let synth = SoftwareSynth::new(sample_rate);
    for tone in tones(target) {
        synth.emit(&tone)?;
    }
    let samples = synth.mixdown();
    write_wav(out, &samples, sample_rate)?;
    log::info!(
        target: crate::runtime::debug::DebugCategory::Audio.target(),
        "Rendered {} samples to {}",
        samples.len(),
        out.display()
    );
    Ok(samples.len())
}
