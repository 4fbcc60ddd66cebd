//! Short UI sound effects (hover, click)

use super::{ToneHandle, ToneSink, presets};
use crate::runtime::debug::DebugCategory;
use crate::runtime::fail_open;
use crate::types::ToneSpec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Starting gain of the hover and click blips
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectLevels {
    pub hover: f64,
    pub click: f64,
}

impl EffectLevels {
    /// Levels used on the intro page
    pub fn intro() -> Self {
        Self {
            hover: 0.1,
            click: 0.3,
        }
    }

    /// Quieter levels used on the main portfolio page
    pub fn main_page() -> Self {
        Self {
            hover: 0.05,
            click: 0.1,
        }
    }
}

impl Default for EffectLevels {
    fn default() -> Self {
        Self::intro()
    }
}

/// Sound effect emitter. Every method is best effort: a missing or failing
/// audio output is logged and otherwise ignored.
#[derive(Clone)]
pub struct SoundEffects {
    sink: Arc<dyn ToneSink>,
    levels: EffectLevels,
}

impl SoundEffects {
    pub fn new(sink: Arc<dyn ToneSink>, levels: EffectLevels) -> Self {
        Self { sink, levels }
    }

    pub fn play(&self, tone: &ToneSpec) -> Option<ToneHandle> {
        fail_open(DebugCategory::Audio, "sound effect", self.sink.emit(tone))
    }

    pub fn hover(&self) -> Option<ToneHandle> {
        self.play(&presets::hover(self.levels.hover))
    }

    pub fn click(&self) -> Option<ToneHandle> {
        self.play(&presets::click(self.levels.click))
    }
}
