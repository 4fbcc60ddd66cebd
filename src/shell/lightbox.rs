//! Full-screen image viewer for portfolio cards

use std::time::{Duration, Instant};

/// Fade-out length; the image is released once it has finished
pub const CLOSE_FADE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxImage {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Default)]
pub struct Lightbox {
    image: Option<LightboxImage>,
    open: bool,
    /// When the image should be dropped after a close
    clear_at: Option<Instant>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show `src`. Page scrolling is locked while this returns true from
    /// [`Lightbox::is_open`].
    pub fn open(&mut self, src: impl Into<String>, alt: impl Into<String>) {
        self.image = Some(LightboxImage {
            src: src.into(),
            alt: alt.into(),
        });
        self.open = true;
        self.clear_at = None;
    }

    pub fn close(&mut self, now: Instant) {
        if self.open {
            self.open = false;
            self.clear_at = Some(now + CLOSE_FADE);
        }
    }

    /// Image still attached at `now` (kept through the fade-out)
    pub fn image_at(&mut self, now: Instant) -> Option<&LightboxImage> {
        if let Some(deadline) = self.clear_at
            && now >= deadline
        {
            self.image = None;
            self.clear_at = None;
        }
        self.image.as_ref()
    }

    /// Returns true when the key was consumed
    pub fn on_key(&mut self, key: &str, now: Instant) -> bool {
        if key == "Escape" && self.open {
            self.close(now);
            return true;
        }
        false
    }

    /// Clicks on the dark backdrop close the viewer, clicks on the image do not
    pub fn on_click(&mut self, on_backdrop: bool, now: Instant) {
        if on_backdrop {
            self.close(now);
        }
    }
}
