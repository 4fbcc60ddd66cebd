//! Frame identifiers and visual state changes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one raster frame of the character animation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(String);

impl FrameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative path of the frame image, e.g. `images/frame1.png`
    pub fn image_path(&self) -> String {
        format!("images/{}.png", self.0)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FrameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Looping animation played by the idle character sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterAnimation {
    /// Gentle bobbing, the default
    Idle,
    /// Three jumps and one spin, then back to idle
    JumpSpin,
}

/// A single change to the page's visual state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualChange {
    /// Overlay layer created with the character showing `frame`
    OverlayInserted { frame: FrameId },
    /// Overlay made visible
    OverlayActivated,
    /// Character starts sliding up from the bottom
    FadeInStarted,
    /// Character frozen in its resting pose, animation marker removed
    Settled,
    /// Instant sprite swap, no transition
    FrameSwapped { frame: FrameId },
    SlashMarked,
    /// Full-screen flash layer created (still transparent)
    FlashInserted,
    FlashActivated,
    /// Text of the trigger control
    TriggerLabel { text: String },
    /// Music toggle icon
    MusicIndicator { playing: bool },
    /// Animation of the character on the intro page
    Character { animation: CharacterAnimation },
}

impl fmt::Display for VisualChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualChange::OverlayInserted { frame } => write!(f, "overlay inserted ({frame})"),
            VisualChange::OverlayActivated => f.write_str("overlay active"),
            VisualChange::FadeInStarted => f.write_str("fade-in-up"),
            VisualChange::Settled => f.write_str("settled"),
            VisualChange::FrameSwapped { frame } => write!(f, "frame -> {frame}"),
            VisualChange::SlashMarked => f.write_str("slash-effect"),
            VisualChange::FlashInserted => f.write_str("white flash inserted"),
            VisualChange::FlashActivated => f.write_str("white flash active"),
            VisualChange::TriggerLabel { text } => write!(f, "button label '{text}'"),
            VisualChange::MusicIndicator { playing } => {
                write!(f, "music {}", if *playing { "on" } else { "off" })
            }
            VisualChange::Character { animation } => write!(f, "character {animation:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_path_follows_images_dir() {
        assert_eq!(FrameId::from("frame3").image_path(), "images/frame3.png");
    }

    #[test]
    fn visual_change_json_is_tagged() {
        let change = VisualChange::FrameSwapped {
            frame: FrameId::from("frame2"),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "frame_swapped", "frame": "frame2" })
        );
    }
}
