//! Tone descriptions: waveform plus frequency and gain envelopes

use crate::error::AudioError;
use serde::{Deserialize, Serialize};

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Square,
    Sawtooth,
    Sine,
}

impl Waveform {
    /// Sample the waveform at `phase` cycles (only the fractional part matters)
    pub fn sample(self, phase: f64) -> f64 {
        let frac = phase.fract();
        match self {
            Waveform::Sine => (std::f64::consts::TAU * frac).sin(),
            Waveform::Square => {
                if frac < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * frac - 1.0,
        }
    }
}

/// A (time, value) point of an envelope, time relative to the tone start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub at_ms: f64,
    pub value: f64,
}

impl Breakpoint {
    pub fn new(at_ms: f64, value: f64) -> Self {
        Self { at_ms, value }
    }
}

/// Piecewise exponential envelope.
///
/// The value holds at the first breakpoint until its time, ramps
/// exponentially between consecutive breakpoints, and holds the last value
/// afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub points: Vec<Breakpoint>,
}

impl Envelope {
    pub fn new(points: Vec<Breakpoint>) -> Self {
        Self { points }
    }

    /// Constant value for the whole tone
    pub fn constant(value: f64) -> Self {
        Self::new(vec![Breakpoint::new(0.0, value)])
    }

    /// Exponential ramp from `from` at 0ms to `to` at `over_ms`
    pub fn ramp(from: f64, to: f64, over_ms: f64) -> Self {
        Self::new(vec![Breakpoint::new(0.0, from), Breakpoint::new(over_ms, to)])
    }

    /// Multiply every breakpoint value by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.points
                .iter()
                .map(|p| Breakpoint::new(p.at_ms, p.value * factor))
                .collect(),
        )
    }

    pub fn value_at(&self, t_ms: f64) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if t_ms <= first.at_ms {
            return first.value;
        }

        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t_ms < b.at_ms {
                let span = b.at_ms - a.at_ms;
                if span <= 0.0 {
                    return b.value;
                }
                let progress = (t_ms - a.at_ms) / span;
                return a.value * (b.value / a.value).powf(progress);
            }
        }

        self.points.last().map(|p| p.value).unwrap_or(0.0)
    }

    /// Breakpoints must be time-ordered with strictly positive values
    pub fn validate(&self, name: &str) -> Result<(), AudioError> {
        if self.points.is_empty() {
            return Err(AudioError::invalid_tone(format!("{name} envelope is empty")));
        }
        for point in &self.points {
            if point.value <= 0.0 || !point.value.is_finite() {
                return Err(AudioError::invalid_tone(format!(
                    "{name} must be positive, got {}",
                    point.value
                )));
            }
        }
        if self.points.windows(2).any(|w| w[1].at_ms < w[0].at_ms) {
            return Err(AudioError::invalid_tone(format!(
                "{name} breakpoints are out of order"
            )));
        }
        Ok(())
    }
}

/// One synthesized emission.
///
/// `start_offset_ms` is relative to the moment the tone is handed to a sink;
/// the sink schedules it, the caller never waits for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub start_offset_ms: f64,
    pub duration_ms: f64,
    pub frequency: Envelope,
    pub gain: Envelope,
}

impl ToneSpec {
    pub fn validate(&self) -> Result<(), AudioError> {
        if self.duration_ms <= 0.0 || !self.duration_ms.is_finite() {
            return Err(AudioError::invalid_tone(format!(
                "duration must be positive, got {}",
                self.duration_ms
            )));
        }
        if self.start_offset_ms < 0.0 {
            return Err(AudioError::invalid_tone("start offset is negative"));
        }
        self.frequency.validate("frequency")?;
        self.gain.validate("gain")
    }

    /// Offset at which the tone stops sounding
    pub fn end_offset_ms(&self) -> f64 {
        self.start_offset_ms + self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn envelope_holds_then_ramps_exponentially() {
        let env = Envelope::ramp(800.0, 200.0, 300.0);

        assert!(close(env.value_at(-5.0), 800.0));
        assert!(close(env.value_at(0.0), 800.0));
        // Geometric midpoint, not arithmetic
        assert!(close(env.value_at(150.0), 400.0));
        assert!(close(env.value_at(300.0), 200.0));
        assert!(close(env.value_at(1000.0), 200.0));
    }

    #[test]
    fn envelope_with_delayed_start_holds_first_value() {
        let env = Envelope::new(vec![
            Breakpoint::new(50.0, 0.4),
            Breakpoint::new(100.0, 0.01),
        ]);
        assert!(close(env.value_at(10.0), 0.4));
        assert!(env.value_at(75.0) < 0.4);
        assert!(env.value_at(75.0) > 0.01);
    }

    #[test]
    fn zero_gain_is_rejected() {
        let tone = ToneSpec {
            waveform: Waveform::Square,
            start_offset_ms: 0.0,
            duration_ms: 100.0,
            frequency: Envelope::constant(440.0),
            gain: Envelope::ramp(0.3, 0.0, 100.0),
        };
        assert!(matches!(
            tone.validate(),
            Err(AudioError::InvalidTone { .. })
        ));
    }

    #[test]
    fn waveforms_stay_in_unit_range() {
        for waveform in [Waveform::Square, Waveform::Sawtooth, Waveform::Sine] {
            for i in 0..100 {
                let s = waveform.sample(i as f64 / 37.0);
                assert!((-1.0..=1.0).contains(&s), "{waveform:?} produced {s}");
            }
        }
        assert_eq!(Waveform::Square.sample(0.25), 1.0);
        assert_eq!(Waveform::Square.sample(0.75), -1.0);
    }

    #[test]
    fn waveform_serializes_lowercase() {
        let json = serde_json::to_string(&Waveform::Sawtooth).unwrap();
        assert_eq!(json, "\"sawtooth\"");
    }
}
