//! # pixelfolio
//!
//! The intro of a pixel-art portfolio page: a timed transition of character
//! frames, a procedurally synthesized slash sound and a looping chiptune
//! melody, driven on the tokio clock against pluggable outputs.
//!
//! The page's environment sits behind three traits: [`surface::Surface`]
//! (visual changes, the trigger control and navigation),
//! [`audio::ToneSink`] (synthesized tones) and [`assets::AssetLoader`]
//! (frame images). Headless implementations of each make the whole
//! sequence testable under paused time.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use pixelfolio::assets::MemoryAssetLoader;
//! use pixelfolio::audio::SoftwareSynth;
//! use pixelfolio::runtime::Sequencer;
//! use pixelfolio::surface::RecordingSurface;
//! use pixelfolio::types::{RunOutcome, Script};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let script = Script::transition();
//! let assets = MemoryAssetLoader::with_frames(&script.frames);
//! let surface = Arc::new(RecordingSurface::new());
//!
//! let sequencer = Sequencer::new(
//!     script,
//!     surface.clone(),
//!     Arc::new(SoftwareSynth::default()),
//!     Arc::new(assets),
//! );
//!
//! let outcome = sequencer.run(|| println!("navigate to main.html")).await;
//! assert_eq!(outcome, RunOutcome::Completed);
//! assert_eq!(surface.changes().len(), 9);
//! # }
//! ```

pub mod assets;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod runtime;
pub mod shell;
pub mod surface;
pub mod types;

pub use config::Config;
pub use error::{AssetError, AudioError, ConfigError, ScriptError, SurfaceError};
pub use runtime::{CancelHandle, Sequencer, fail_open};
pub use shell::{IntroPage, MainPage};
pub use types::{RunOutcome, Script, SequencerEvent, Step, ToneSpec, VisualChange};
