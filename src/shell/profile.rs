//! Profile photo that turns into the character sprite on hover

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const PROFILE_SRC: &str = "images/profile.jpg";
pub const CHARACTER_SRC: &str = "images/character.png";

/// Opacity while the photo is fading before a swap
pub const FADED_OPACITY: f64 = 0.3;
pub const SWAP_DELAY: Duration = Duration::from_millis(200);

/// What the photo frame shows at a given moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoView {
    pub src: &'static str,
    pub opacity: f64,
    /// Aura around the frame while the character is shown
    pub power_mode: bool,
}

#[derive(Debug)]
pub struct ProfilePhoto {
    view: PhotoView,
    /// Swaps waiting for their delay, oldest first: (due, show character)
    pending: VecDeque<(Instant, bool)>,
}

impl ProfilePhoto {
    pub fn new() -> Self {
        Self {
            view: PhotoView {
                src: PROFILE_SRC,
                opacity: 1.0,
                power_mode: false,
            },
            pending: VecDeque::new(),
        }
    }

    pub fn on_enter(&mut self, now: Instant) {
        self.begin_swap(now, true);
    }

    pub fn on_leave(&mut self, now: Instant) {
        self.begin_swap(now, false);
    }

    pub fn view_at(&mut self, now: Instant) -> PhotoView {
        self.settle(now);
        self.view
    }

    /// Every swap fires after its own delay, even when the pointer already
    /// moved on, so a quick enter and leave ends on the profile photo.
    fn begin_swap(&mut self, now: Instant, character: bool) {
        self.settle(now);
        self.view.opacity = FADED_OPACITY;
        self.pending.push_back((now + SWAP_DELAY, character));
    }

    fn settle(&mut self, now: Instant) {
        while let Some(&(due, character)) = self.pending.front() {
            if due > now {
                break;
            }
            self.pending.pop_front();
            self.view = PhotoView {
                src: if character { CHARACTER_SRC } else { PROFILE_SRC },
                opacity: 1.0,
                power_mode: character,
            };
        }
    }
}

impl Default for ProfilePhoto {
    fn default() -> Self {
        Self::new()
    }
}
