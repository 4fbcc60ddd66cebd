//! Page shell: the event wiring around the sequencer
//!
//! [`IntroPage`] owns the start button, the music toggle and the transition;
//! [`MainPage`] owns navigation highlighting, the lightbox, the profile photo
//! and the easter egg. Both are plain owned objects constructed at page init and dropped on
//! unload.

pub mod intro;
pub mod konami;
pub mod lightbox;
pub mod main_page;
pub mod nav;
pub mod profile;

pub use intro::IntroPage;
pub use konami::KonamiDetector;
pub use lightbox::{Lightbox, LightboxImage};
pub use main_page::{KeyOutcome, MainPage, RAINBOW, ScrollUpdate};
pub use nav::{MobileMenu, Section};
pub use profile::{PhotoView, ProfilePhoto};
