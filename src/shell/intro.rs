//! Intro page: start button, music toggle and the transition hand-off

use crate::assets::AssetLoader;
use crate::audio::{BackgroundMusic, EffectLevels, SoundEffects, ToneSink};
use crate::config::Config;
use crate::runtime::debug::DebugCategory;
use crate::runtime::{self, Sequencer, fail_open};
use crate::surface::Surface;
use crate::types::{CharacterAnimation, RunOutcome, Script, VisualChange};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const START_LABEL: &str = "START";
pub const LOADING_LABEL: &str = "LOADING...";

/// Length of the jump-and-spin secret before the character idles again
pub const JUMP_SPIN: Duration = Duration::from_millis(2500);

pub struct IntroPage {
    surface: Arc<dyn Surface>,
    effects: SoundEffects,
    music: BackgroundMusic,
    sequencer: Sequencer,
    navigate_to: String,
    start_delay: Duration,
    /// Set once the start button has been pressed
    started: AtomicBool,
    /// Autoplay was refused; start music on the first interaction
    awaiting_interaction: AtomicBool,
}

impl IntroPage {
    pub fn new(
        config: &Config,
        surface: Arc<dyn Surface>,
        sink: Arc<dyn ToneSink>,
        assets: Arc<dyn AssetLoader>,
    ) -> Self {
        let sequencer = Sequencer::new(
            Script::transition(),
            Arc::clone(&surface),
            Arc::clone(&sink),
            assets,
        )
        .with_preload_budget(config.preload_timeout());

        Self {
            effects: SoundEffects::new(Arc::clone(&sink), EffectLevels::intro()),
            music: BackgroundMusic::new(sink, config.music),
            surface,
            sequencer,
            navigate_to: config.navigate_to.clone(),
            start_delay: config.start_delay(),
            started: AtomicBool::new(false),
            awaiting_interaction: AtomicBool::new(false),
        }
    }

    pub fn music(&self) -> &BackgroundMusic {
        &self.music
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Try to autoplay the music. Returns whether it started; when it did
    /// not, music starts on the first click, key press or touch instead.
    pub fn on_load(&self) -> bool {
        match self.music.start() {
            Ok(()) => {
                self.set_indicator(true);
                true
            }
            Err(err) => {
                log::info!(
                    target: DebugCategory::Shell.target(),
                    "Autoplay blocked ({err}), waiting for user interaction"
                );
                self.awaiting_interaction.store(true, Ordering::SeqCst);
                false
            }
        }
    }

    /// Any click, key press or touch on the page
    pub fn on_interaction(&self) {
        if !self.awaiting_interaction.load(Ordering::SeqCst) || self.music.is_playing() {
            return;
        }
        if fail_open(DebugCategory::Music, "music start", self.music.start()).is_some() {
            self.awaiting_interaction.store(false, Ordering::SeqCst);
            self.set_indicator(true);
        }
    }

    /// Music toggle button. Returns whether music is now playing.
    pub fn on_music_toggle(&self) -> bool {
        self.awaiting_interaction.store(false, Ordering::SeqCst);
        let playing = fail_open(DebugCategory::Music, "music toggle", self.music.toggle())
            .unwrap_or(false);
        self.set_indicator(playing);
        self.effects.click();
        playing
    }

    pub fn on_start_hover(&self) {
        self.effects.hover();
    }

    /// Start button: stop the music, show the loading label, play the
    /// transition and navigate away when it completes.
    pub async fn on_start_clicked(&self) -> RunOutcome {
        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return RunOutcome::AlreadyRunning;
        }
        self.awaiting_interaction.store(false, Ordering::SeqCst);

        self.effects.click();
        self.music.stop();
        self.set_indicator(false);

        let cancel = self.sequencer.cancel_handle();
        cancel.clear();
        let mut cancelled = cancel.watch();

        self.surface.set_trigger_enabled(false);
        self.set_label(LOADING_LABEL);

        if !runtime::hold(&mut cancelled, self.start_delay).await {
            log::info!(target: DebugCategory::Shell.target(), "Start cancelled before the transition");
            self.surface.set_trigger_enabled(true);
            self.set_label(START_LABEL);
            self.started.store(false, Ordering::SeqCst);
            return RunOutcome::Cancelled;
        }

        let surface = Arc::clone(&self.surface);
        let target = self.navigate_to.clone();
        let outcome = self
            .sequencer
            .run(move || {
                fail_open(DebugCategory::Shell, "navigation", surface.navigate(&target));
            })
            .await;

        if outcome == RunOutcome::Cancelled {
            self.set_label(START_LABEL);
            self.started.store(false, Ordering::SeqCst);
        }
        outcome
    }

    /// Ctrl+Shift+K: the character jumps three times and spins, then goes
    /// back to idling. Returns whether the combination matched.
    pub fn on_key_combo(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        if !(ctrl && shift && key == "K") {
            return false;
        }
        self.set_character(CharacterAnimation::JumpSpin);

        let surface = Arc::clone(&self.surface);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(JUMP_SPIN).await;
                    fail_open(
                        DebugCategory::Shell,
                        "character animation",
                        surface.apply(&VisualChange::Character {
                            animation: CharacterAnimation::Idle,
                        }),
                    );
                });
            }
            Err(_) => log::warn!(
                target: DebugCategory::Shell.target(),
                "No async runtime, character stays in its jump animation"
            ),
        }
        true
    }

    /// Enter and Space press the start button
    pub async fn on_key(&self, key: &str) -> Option<RunOutcome> {
        match key {
            "Enter" | " " => Some(self.on_start_clicked().await),
            _ => {
                self.on_interaction();
                None
            }
        }
    }

    fn set_label(&self, text: &str) {
        fail_open(
            DebugCategory::Shell,
            "trigger label",
            self.surface.apply(&VisualChange::TriggerLabel {
                text: text.to_string(),
            }),
        );
    }

    fn set_character(&self, animation: CharacterAnimation) {
        fail_open(
            DebugCategory::Shell,
            "character animation",
            self.surface.apply(&VisualChange::Character { animation }),
        );
    }

    fn set_indicator(&self, playing: bool) {
        fail_open(
            DebugCategory::Shell,
            "music indicator",
            self.surface.apply(&VisualChange::MusicIndicator { playing }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetLoader;
    use crate::audio::{NullSink, SoftwareSynth, ToneHandle};
    use crate::error::AudioError;
    use crate::surface::RecordingSurface;
    use crate::types::{SequencerEvent, ToneSpec};

    /// Sink that refuses to resume until a user gesture has been simulated
    struct GestureGatedSink {
        inner: SoftwareSynth,
        unlocked: AtomicBool,
    }

    impl ToneSink for GestureGatedSink {
        fn resume(&self) -> Result<(), AudioError> {
            if self.unlocked.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(AudioError::unavailable("autoplay blocked"))
            }
        }

        fn emit(&self, tone: &ToneSpec) -> Result<ToneHandle, AudioError> {
            self.inner.emit(tone)
        }

        fn silence(&self, handle: ToneHandle) {
            self.inner.silence(handle)
        }

        fn silence_all(&self) {
            self.inner.silence_all()
        }
    }

    fn page(sink: Arc<dyn ToneSink>) -> (IntroPage, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::new());
        let frames = Script::transition().frames;
        let page = IntroPage::new(
            &Config::default(),
            surface.clone(),
            sink,
            Arc::new(MemoryAssetLoader::with_frames(&frames)),
        );
        (page, surface)
    }

    #[tokio::test(start_paused = true)]
    async fn start_click_runs_transition_then_navigates() {
        let synth = Arc::new(SoftwareSynth::new(8_000));
        let (page, surface) = page(synth.clone());

        assert!(page.on_load());
        tokio::time::sleep(std::time::Duration::from_millis(1000)).await;

        let outcome = page.on_start_clicked().await;
        assert_eq!(outcome, RunOutcome::Completed);
        assert!(!page.music().is_playing());

        assert_eq!(
            surface.applied_at(&VisualChange::TriggerLabel {
                text: LOADING_LABEL.to_string()
            }),
            Some(1000)
        );
        // 500ms pause, then the 3450ms transition
        assert_eq!(surface.navigations(), vec![(1000 + 500 + 3450, "main.html".to_string())]);
        assert_eq!(
            surface.applied_at(&VisualChange::OverlayActivated),
            Some(1500)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn start_click_only_counts_once() {
        let (page, surface) = page(Arc::new(SoftwareSynth::new(8_000)));

        let first = page.on_start_clicked();
        let second = async {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            page.on_start_clicked().await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, RunOutcome::Completed);
        assert_eq!(second, RunOutcome::AlreadyRunning);
        assert_eq!(surface.navigations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_autoplay_waits_for_interaction() {
        let sink = Arc::new(GestureGatedSink {
            inner: SoftwareSynth::new(8_000),
            unlocked: AtomicBool::new(false),
        });
        let (page, surface) = page(sink.clone());

        assert!(!page.on_load());
        assert!(!page.music().is_playing());

        sink.unlocked.store(true, Ordering::SeqCst);
        page.on_interaction();
        assert!(page.music().is_playing());
        assert_eq!(
            surface.applied_at(&VisualChange::MusicIndicator { playing: true }),
            Some(0)
        );
        page.music().stop();
    }

    #[tokio::test(start_paused = true)]
    async fn start_click_clears_pending_autoplay() {
        let sink = Arc::new(GestureGatedSink {
            inner: SoftwareSynth::new(8_000),
            unlocked: AtomicBool::new(false),
        });
        let (page, _surface) = page(sink.clone());
        assert!(!page.on_load());

        sink.unlocked.store(true, Ordering::SeqCst);
        page.on_start_clicked().await;
        page.on_interaction();
        assert!(!page.music().is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn music_toggle_updates_indicator() {
        let (page, surface) = page(Arc::new(SoftwareSynth::new(8_000)));

        assert!(page.on_music_toggle());
        assert!(!page.on_music_toggle());
        let indicators: Vec<VisualChange> = surface
            .changes()
            .into_iter()
            .map(|(_, change)| change)
            .filter(|change| matches!(change, VisualChange::MusicIndicator { .. }))
            .collect();
        assert_eq!(
            indicators,
            vec![
                VisualChange::MusicIndicator { playing: true },
                VisualChange::MusicIndicator { playing: false },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn page_without_audio_still_transitions() {
        let (page, surface) = page(Arc::new(NullSink));

        assert!(!page.on_load());
        assert!(!page.on_music_toggle());
        assert_eq!(page.on_key("Enter").await, Some(RunOutcome::Completed));
        assert_eq!(surface.navigations().len(), 1);
        assert_eq!(
            page.sequencer()
                .timeline()
                .count(|e| matches!(e, SequencerEvent::ToneFailed { .. })),
            3
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_start_delay_stops_the_page() {
        let (page, surface) = page(Arc::new(SoftwareSynth::new(8_000)));
        let handle = page.sequencer().cancel_handle();

        let click = page.on_start_clicked();
        let cancel = async {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            handle.cancel();
        };
        let (outcome, ()) = tokio::join!(click, cancel);

        assert_eq!(outcome, RunOutcome::Cancelled);
        assert!(surface.navigations().is_empty());
        assert!(surface.trigger_enabled());
        assert_eq!(surface.applied_at(&VisualChange::OverlayActivated), None);
        assert_eq!(
            surface.applied_at(&VisualChange::TriggerLabel {
                text: START_LABEL.to_string()
            }),
            Some(200)
        );

        // A cancel left over from the aborted start does not block the next one
        assert_eq!(page.on_start_clicked().await, RunOutcome::Completed);
        assert_eq!(surface.navigations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_navigation_still_completes() {
        let surface = Arc::new(RecordingSurface::new().blocking_navigation());
        let frames = Script::transition().frames;
        let page = IntroPage::new(
            &Config::default(),
            surface.clone(),
            Arc::new(SoftwareSynth::new(8_000)),
            Arc::new(MemoryAssetLoader::with_frames(&frames)),
        );

        assert_eq!(page.on_start_clicked().await, RunOutcome::Completed);
        assert!(surface.navigations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn ctrl_shift_k_jumps_then_idles() {
        let (page, surface) = page(Arc::new(SoftwareSynth::new(8_000)));

        assert!(!page.on_key_combo("K", true, false));
        assert!(!page.on_key_combo("k", true, true));
        assert!(page.on_key_combo("K", true, true));

        tokio::time::sleep(JUMP_SPIN + std::time::Duration::from_millis(10)).await;
        let animations: Vec<(u64, VisualChange)> = surface
            .changes()
            .into_iter()
            .filter(|(_, change)| matches!(change, VisualChange::Character { .. }))
            .collect();
        assert_eq!(
            animations,
            vec![
                (
                    0,
                    VisualChange::Character {
                        animation: CharacterAnimation::JumpSpin
                    }
                ),
                (
                    2500,
                    VisualChange::Character {
                        animation: CharacterAnimation::Idle
                    }
                ),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn other_keys_do_not_start() {
        let (page, surface) = page(Arc::new(SoftwareSynth::new(8_000)));
        assert_eq!(page.on_key("x").await, None);
        assert!(surface.navigations().is_empty());
        assert!(surface.trigger_enabled());
    }
}
