//! Core types for the pixelfolio library
//!
//! This module contains the plain data that the runtime drives:
//! - Tone: one synthesized waveform emission with its envelopes
//! - Visual: frame identifiers and the visual changes applied to the page
//! - Script: the ordered step table of the intro transition
//! - State: transient sequencer state
//! - Event: timeline records emitted while the sequence runs

pub mod event;
pub mod script;
pub mod state;
pub mod tone;
pub mod visual;

pub use event::{SequencerEvent, TimedEvent, Timeline};
pub use script::{Script, Step};
pub use state::{RunOutcome, SequencerState};
pub use tone::{Breakpoint, Envelope, ToneSpec, Waveform};
pub use visual::{CharacterAnimation, FrameId, VisualChange};
