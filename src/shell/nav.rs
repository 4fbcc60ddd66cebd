//! Section highlighting, smooth-scroll targets and the mobile menu

/// Pixels below the viewport top at which a section counts as reached
pub const LOOKAHEAD: f64 = 150.0;

/// Background scroll speed relative to the page
pub const PARALLAX_SPEED: f64 = 0.5;

/// Extra vertical shift per section, in document order
pub const PARALLAX_STAGGER: f64 = 100.0;

/// Viewport width above which the mobile menu is never shown
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Vertical extent of one page section
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Section whose nav link should be highlighted at `scroll_y`.
/// When sections overlap the last one in document order wins.
pub fn active_section(sections: &[Section], scroll_y: f64) -> Option<&Section> {
    let reached = scroll_y + LOOKAHEAD;
    sections.iter().rev().find(|s| s.contains(reached))
}

/// Scroll position that puts `section` just under a fixed nav bar
pub fn scroll_target(section: &Section, nav_height: f64) -> f64 {
    (section.top - nav_height).max(0.0)
}

/// Background offset of every section at `scroll_y`, indexed like the sections
pub fn parallax_offsets(section_count: usize, scroll_y: f64) -> Vec<f64> {
    (0..section_count)
        .map(|index| -(scroll_y * PARALLAX_SPEED) + index as f64 * PARALLAX_STAGGER)
        .collect()
}

/// Hamburger menu state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Growing past the breakpoint closes the menu
    pub fn on_resize(&mut self, width: f64) {
        if width > MOBILE_BREAKPOINT {
            self.open = false;
        }
    }
}
