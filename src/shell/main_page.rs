//! Main portfolio page wiring

use super::konami::KonamiDetector;
use super::lightbox::Lightbox;
use super::nav::{self, MobileMenu, Section};
use super::profile::{PhotoView, ProfilePhoto};
use crate::audio::{EffectLevels, SoundEffects, ToneSink};
use crate::runtime::debug::DebugCategory;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long the page stays in rainbow mode after the Konami code
pub const RAINBOW: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    LightboxClosed,
    /// Last key of the Konami code; the page turns rainbow for this long
    EasterEgg { rainbow_for: Duration },
    Ignored,
}

/// Result of one scroll event
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollUpdate {
    /// Newly highlighted section, when it changed
    pub highlight: Option<String>,
    /// Background offset per section
    pub parallax: Vec<f64>,
}

pub struct MainPage {
    effects: SoundEffects,
    sections: Vec<Section>,
    nav_height: f64,
    active: Option<String>,
    menu: MobileMenu,
    lightbox: Lightbox,
    konami: KonamiDetector,
    rainbow_until: Option<Instant>,
    photo: ProfilePhoto,
}

impl MainPage {
    pub fn new(sink: Arc<dyn ToneSink>, sections: Vec<Section>, nav_height: f64) -> Self {
        Self {
            effects: SoundEffects::new(sink, EffectLevels::main_page()),
            sections,
            nav_height,
            active: None,
            menu: MobileMenu::new(),
            lightbox: Lightbox::new(),
            konami: KonamiDetector::new(),
            rainbow_until: None,
            photo: ProfilePhoto::new(),
        }
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn menu(&self) -> &MobileMenu {
        &self.menu
    }

    pub fn lightbox(&mut self) -> &mut Lightbox {
        &mut self.lightbox
    }

    pub fn on_scroll(&mut self, scroll_y: f64) -> ScrollUpdate {
        let current = nav::active_section(&self.sections, scroll_y).map(|s| s.id.clone());
        let highlight = if current.is_some() && current != self.active {
            self.active = current.clone();
            current
        } else {
            None
        };
        ScrollUpdate {
            highlight,
            parallax: nav::parallax_offsets(self.sections.len(), scroll_y),
        }
    }

    /// Nav link click: returns the smooth-scroll target for `section_id`
    pub fn on_nav_click(&mut self, section_id: &str) -> Option<f64> {
        self.effects.click();
        let Some(section) = self.sections.iter().find(|s| s.id == section_id) else {
            log::debug!(target: DebugCategory::Shell.target(), "No section '{section_id}'");
            return None;
        };
        self.menu.close();
        Some(nav::scroll_target(section, self.nav_height))
    }

    pub fn on_menu_toggle(&mut self) -> bool {
        self.effects.click();
        self.menu.toggle()
    }

    pub fn on_card_click(&mut self, src: &str, alt: &str) {
        self.effects.click();
        self.lightbox.open(src, alt);
    }

    pub fn on_hover(&self) {
        self.effects.hover();
    }

    pub fn on_resize(&mut self, width: f64) {
        self.menu.on_resize(width);
    }

    pub fn on_photo_enter(&mut self, now: Instant) {
        self.photo.on_enter(now);
    }

    pub fn on_photo_leave(&mut self, now: Instant) {
        self.photo.on_leave(now);
    }

    pub fn photo(&mut self, now: Instant) -> PhotoView {
        self.photo.view_at(now)
    }

    pub fn rainbow_active(&self, now: Instant) -> bool {
        self.rainbow_until.is_some_and(|until| now < until)
    }

    pub fn on_key(&mut self, key: &str, now: Instant) -> KeyOutcome {
        if self.lightbox.on_key(key, now) {
            return KeyOutcome::LightboxClosed;
        }
        if self.konami.push(key) {
            log::info!(target: DebugCategory::Shell.target(), "Konami code entered");
            self.rainbow_until = Some(now + RAINBOW);
            return KeyOutcome::EasterEgg { rainbow_for: RAINBOW };
        }
        KeyOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullSink, SoftwareSynth};
    use crate::shell::konami::KONAMI_CODE;

    fn sections() -> Vec<Section> {
        vec![
            Section::new("about", 0.0, 800.0),
            Section::new("works", 800.0, 1200.0),
        ]
    }

    #[test]
    fn scroll_reports_highlight_changes_only() {
        let mut page = MainPage::new(Arc::new(NullSink), sections(), 60.0);

        let first = page.on_scroll(0.0);
        assert_eq!(first.highlight.as_deref(), Some("about"));
        assert_eq!(page.on_scroll(100.0).highlight, None);

        let update = page.on_scroll(700.0);
        assert_eq!(update.highlight.as_deref(), Some("works"));
        assert_eq!(update.parallax, vec![-350.0, -250.0]);
        assert_eq!(page.active_section(), Some("works"));
    }

    #[test]
    fn nav_click_scrolls_under_the_bar_and_closes_menu() {
        let mut page = MainPage::new(Arc::new(NullSink), sections(), 60.0);
        assert!(page.on_menu_toggle());
        assert_eq!(page.on_nav_click("works"), Some(740.0));
        assert!(!page.menu().is_open());
        assert_eq!(page.on_nav_click("missing"), None);
    }

    #[test]
    fn unknown_nav_target_leaves_menu_open() {
        let mut page = MainPage::new(Arc::new(NullSink), sections(), 60.0);
        assert!(page.on_menu_toggle());
        assert_eq!(page.on_nav_click("missing"), None);
        assert!(page.menu().is_open());
    }

    #[test]
    fn escape_closes_lightbox_before_konami() {
        let now = Instant::now();
        let mut page = MainPage::new(Arc::new(NullSink), sections(), 60.0);
        page.on_card_click("images/work1.png", "Work");
        assert!(page.lightbox().is_open());
        assert_eq!(page.on_key("Escape", now), KeyOutcome::LightboxClosed);
        assert_eq!(page.on_key("Escape", now), KeyOutcome::Ignored);
    }

    #[tokio::test(start_paused = true)]
    async fn konami_code_turns_rainbow_without_sound() {
        let synth = Arc::new(SoftwareSynth::new(8_000));
        let mut page = MainPage::new(synth.clone(), sections(), 60.0);
        let now = Instant::now();
        assert!(!page.rainbow_active(now));

        let outcomes: Vec<KeyOutcome> = KONAMI_CODE.iter().map(|k| page.on_key(k, now)).collect();
        assert_eq!(
            outcomes.last(),
            Some(&KeyOutcome::EasterEgg {
                rainbow_for: RAINBOW
            })
        );
        assert!(synth.emitted().is_empty());
        assert!(page.rainbow_active(now + Duration::from_millis(4999)));
        assert!(!page.rainbow_active(now + Duration::from_millis(5000)));
    }

    #[test]
    fn profile_photo_swaps_after_hover_delay() {
        let now = Instant::now();
        let mut page = MainPage::new(Arc::new(NullSink), sections(), 60.0);

        page.on_photo_enter(now);
        assert_eq!(page.photo(now).opacity, 0.3);
        let view = page.photo(now + Duration::from_millis(200));
        assert_eq!(view.src, "images/character.png");
        assert!(view.power_mode);

        page.on_photo_leave(now + Duration::from_millis(500));
        let view = page.photo(now + Duration::from_millis(700));
        assert_eq!(view.src, "images/profile.jpg");
        assert_eq!(view.opacity, 1.0);
        assert!(!view.power_mode);
    }

    #[tokio::test(start_paused = true)]
    async fn effects_use_main_page_levels() {
        let synth = Arc::new(SoftwareSynth::new(8_000));
        let page = MainPage::new(synth.clone(), sections(), 60.0);
        page.on_hover();
        let emitted = synth.emitted();
        assert_eq!(emitted[0].1.gain.value_at(0.0), 0.05);
    }
}
