//! Terminal player for the intro page
//!
//! Renders every visual change as a timestamped line and mixes the audio
//! with the software synth, optionally saving it as a WAV file.

use crate::assets::FileSystemAssetLoader;
use crate::audio::SoftwareSynth;
use crate::audio::wav::write_wav;
use crate::config::Config;
use crate::shell::IntroPage;
use crate::surface::TerminalSurface;
use crate::types::{RunOutcome, SequencerEvent};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    /// Skip the "press Enter" prompt
    pub auto_start: bool,
    /// Where to write the mixed audio
    pub wav_out: Option<PathBuf>,
}

pub async fn run_play(config: &Config, options: &PlayOptions) -> anyhow::Result<RunOutcome> {
    let synth = Arc::new(SoftwareSynth::new(config.sample_rate));
    let page = IntroPage::new(
        config,
        Arc::new(TerminalSurface::new()),
        synth.clone(),
        Arc::new(FileSystemAssetLoader::new(&config.assets_dir)),
    );

    println!("=== pixelfolio intro ===");
    println!();
    if page.on_load() {
        println!("Background music playing");
    }

    if !options.auto_start {
        println!("Press Enter to start...");
        wait_input().await?;
    }

    let outcome = page.on_start_clicked().await;
    println!();
    print_summary(&page, outcome);

    if let Some(path) = &options.wav_out {
        let samples = synth.mixdown();
        write_wav(path, &samples, synth.sample_rate())?;
        println!(
            "Wrote {} samples to {}",
            samples.len(),
            path.display()
        );
    }

    Ok(outcome)
}

fn print_summary(page: &IntroPage, outcome: RunOutcome) {
    let timeline = page.sequencer().timeline();
    if let Some(at) = timeline.first_at(|e| matches!(e, SequencerEvent::PreloadFinished { .. })) {
        println!("Frames preloaded after {at}ms");
    }
    let failures = timeline.count(|e| {
        matches!(
            e,
            SequencerEvent::ToneFailed { .. } | SequencerEvent::VisualFailed { .. }
        )
    });
    if failures > 0 {
        println!("{failures} effect(s) skipped");
    }
    match outcome {
        RunOutcome::Completed => println!("Transition complete"),
        RunOutcome::AlreadyRunning => println!("Transition already running"),
        RunOutcome::Cancelled => println!("Transition cancelled"),
    }
}

async fn wait_input() -> anyhow::Result<()> {
    io::stdout().flush()?;
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|_| ())
    })
    .await??;
    Ok(())
}
