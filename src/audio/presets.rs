//! Fixed tone recipes used across the page

use crate::types::{Breakpoint, Envelope, ToneSpec, Waveform};

/// Gain every decaying tone fades to (exponential ramps cannot reach zero)
pub const DECAY_FLOOR: f64 = 0.01;

/// Melody, one entry per tick: C5 D5 E5 G5 | A5 G5 E5 D5 | C5 D5 E5 C5 | E5 G5 A5 G5
pub const MELODY: [f64; 16] = [
    523.25, 587.33, 659.25, 783.99, //
    880.00, 783.99, 659.25, 587.33, //
    523.25, 587.33, 659.25, 523.25, //
    659.25, 783.99, 880.00, 783.99,
];

/// Bass line two octaves below the melody
pub const BASS: [f64; 16] = [
    130.81, 146.83, 164.81, 196.00, //
    220.00, 196.00, 164.81, 146.83, //
    130.81, 146.83, 164.81, 130.81, //
    164.81, 196.00, 220.00, 196.00,
];

/// A square blip at a fixed pitch decaying from `gain` over `duration_ms`
pub fn blip(frequency: f64, gain: f64, duration_ms: f64) -> ToneSpec {
    ToneSpec {
        waveform: Waveform::Square,
        start_offset_ms: 0.0,
        duration_ms,
        frequency: Envelope::constant(frequency),
        gain: Envelope::ramp(gain, DECAY_FLOOR, duration_ms),
    }
}

pub fn hover(gain: f64) -> ToneSpec {
    blip(600.0, gain, 50.0)
}

pub fn click(gain: f64) -> ToneSpec {
    blip(800.0, gain, 100.0)
}

/// Katana slash: a falling sawtooth whoosh, a high sine zing at 150ms and a
/// low square impact at 200ms.
pub fn slash() -> [ToneSpec; 3] {
    let whoosh = ToneSpec {
        waveform: Waveform::Sawtooth,
        start_offset_ms: 0.0,
        duration_ms: 300.0,
        frequency: Envelope::ramp(800.0, 200.0, 300.0),
        gain: Envelope::ramp(0.3, DECAY_FLOOR, 300.0),
    };
    let impact = ToneSpec {
        waveform: Waveform::Square,
        start_offset_ms: 200.0,
        duration_ms: 150.0,
        frequency: Envelope::ramp(150.0, 50.0, 150.0),
        gain: Envelope::ramp(0.4, DECAY_FLOOR, 150.0),
    };
    // Pitch tops out at 100ms, the gain keeps decaying until the tone stops
    let zing = ToneSpec {
        waveform: Waveform::Sine,
        start_offset_ms: 150.0,
        duration_ms: 150.0,
        frequency: Envelope::new(vec![
            Breakpoint::new(0.0, 2000.0),
            Breakpoint::new(100.0, 4000.0),
        ]),
        gain: Envelope::ramp(0.2, DECAY_FLOOR, 150.0),
    };
    [whoosh, impact, zing]
}

/// One melody tick voice. Bass notes sit quieter than the lead; both are
/// scaled by the music master volume.
pub fn melody_note(frequency: f64, is_bass: bool, volume: f64, duration_ms: f64) -> ToneSpec {
    let level = if is_bass { 0.3 } else { 0.5 };
    ToneSpec {
        waveform: Waveform::Square,
        start_offset_ms: 0.0,
        duration_ms,
        frequency: Envelope::constant(frequency),
        gain: Envelope::ramp(level, DECAY_FLOOR, duration_ms).scaled(volume),
    }
}
