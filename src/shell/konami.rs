//! Konami code easter egg

use std::collections::VecDeque;

pub const KONAMI_CODE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// Rolling window over the most recent key presses
#[derive(Debug, Default)]
pub struct KonamiDetector {
    recent: VecDeque<String>,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key; returns true when it completes the code
    pub fn push(&mut self, key: &str) -> bool {
        self.recent.push_back(key.to_string());
        while self.recent.len() > KONAMI_CODE.len() {
            self.recent.pop_front();
        }
        let matched = self.recent.len() == KONAMI_CODE.len()
            && self.recent.iter().zip(KONAMI_CODE).all(|(k, c)| k == c);
        if matched {
            self.recent.clear();
        }
        matched
    }
}
