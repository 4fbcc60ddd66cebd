//! CLI entry point for pixelfolio
//!
//! Plays the intro transition in the terminal, dumps its script and renders
//! its sounds to WAV files.

use pixelfolio::cli::play::{PlayOptions, run_play};
use pixelfolio::cli::render::{RenderTarget, run_render};
use pixelfolio::cli::{load_config, script_json};
use pixelfolio::config::Config;
use pixelfolio::runtime::debug::{DebugConfig, StderrLogger};
use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];
    let rest = &args[2..];

    match command.as_str() {
        "play" => {
            let config = config_from(rest);
            install_logger(&config, rest);
            let options = PlayOptions {
                auto_start: rest.iter().any(|a| a == "--auto"),
                wav_out: flag_value(rest, "--wav").map(PathBuf::from),
            };
            play(&config, &options);
        }
        "script" => match script_json() {
            Ok(json) => println!("{json}"),
            Err(err) => fail("Failed to serialize script", err),
        },
        "render" => {
            let Some(out) = rest.first().filter(|a| !a.starts_with("--")) else {
                eprintln!("Error: Missing output file path");
                eprintln!();
                print_usage();
                process::exit(1);
            };
            let config = config_from(rest);
            install_logger(&config, rest);
            let target = match flag_value(rest, "--music") {
                Some(ticks) => match ticks.parse::<usize>() {
                    Ok(ticks) => RenderTarget::Melody {
                        ticks,
                        settings: config.music,
                    },
                    Err(_) => {
                        eprintln!("Error: --music expects a note count, got '{ticks}'");
                        process::exit(1);
                    }
                },
                None => RenderTarget::Slash,
            };
            match run_render(&PathBuf::from(out), target, config.sample_rate) {
                Ok(samples) => println!("Wrote {samples} samples to {out}"),
                Err(err) => fail("Render failed", err),
            }
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Error: Unknown command '{}'", command);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("pixelfolio - Pixel-art portfolio intro");
    println!();
    println!("USAGE:");
    println!("    pixelfolio <command> [options]");
    println!();
    println!("COMMANDS:");
    println!("    play                     Play the intro transition in the terminal");
    println!("    script                   Print the transition script as JSON");
    println!("    render <out.wav>         Render the slash effect to a WAV file");
    println!("    --help, -h               Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    JSON configuration file");
    println!("    --assets <dir>     Directory containing images/frame*.png (play)");
    println!("    --wav <file>       Save the mixed audio after playing (play)");
    println!("    --auto             Start without waiting for Enter (play)");
    println!("    --music <notes>    Render that many melody notes instead (render)");
    println!("    --debug            Show debug output for every category");
    println!();
    println!("EXAMPLES:");
    println!("    pixelfolio play --assets site/ --auto");
    println!("    pixelfolio render slash.wav");
    println!("    pixelfolio render theme.wav --music 16");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn config_from(args: &[String]) -> Config {
    let path = flag_value(args, "--config").map(PathBuf::from);
    let mut config = match load_config(path.as_deref()) {
        Ok(config) => config,
        Err(err) => fail("Failed to load configuration", err),
    };
    if let Some(dir) = flag_value(args, "--assets") {
        config.assets_dir = PathBuf::from(dir);
    }
    config
}

fn install_logger(config: &Config, args: &[String]) {
    let debug = if args.iter().any(|a| a == "--debug") {
        DebugConfig::verbose()
    } else {
        config.debug.clone()
    };
    if let Err(err) = StderrLogger::install(debug) {
        eprintln!("Warning: logger already installed ({err})");
    }
}

fn play(config: &Config, options: &PlayOptions) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => fail("Failed to start async runtime", err),
    };
    if let Err(err) = runtime.block_on(run_play(config, options)) {
        fail("Player mode failed", err);
    }
}

fn fail(context: &str, reason: impl std::fmt::Display) -> ! {
    eprintln!("Error: {context}");
    eprintln!("Reason: {reason}");
    process::exit(1);
}
