// bilimux-cli/src/main.rs
//
// Entry point for the bilimux command-line tool.
//
// Responsibilities:
// - Parsing command-line arguments.
// - Setting up console logging.
// - Configuring the bilimux-core library from the arguments.
// - Invoking the core processing pass (`bilimux_core::process_items`).
// - Displaying a summary of the run.
// - Managing the process exit code: per-item failures still exit 0, only
//   a run that could not start exits non-zero.

mod cli;
mod logging;
mod output;

use bilimux_core::external::{FfmpegTranscoder, FfprobeProber};
use bilimux_core::{CoreConfig, CoreResult, RunReport};
use clap::Parser;
use cli::Cli;
use colored::*;
use log::info;
use std::process;
use std::time::Instant;

fn run(cli: &Cli) -> CoreResult<RunReport> {
    let mut config = CoreConfig::new(cli.base_dir.clone());
    config.outputs = cli.output_selection();
    if let Some(output_dir) = &cli.output_dir {
        config.video_dir = output_dir.clone();
    }
    if let Some(audio_dir) = &cli.audio_dir {
        config.audio_dir = audio_dir.clone();
    }

    info!("Base directory: {}", config.base_dir.display());

    let prober = FfprobeProber::new(config.probe_timeout);
    let transcoder = FfmpegTranscoder::new(config.transcode_timeout);

    bilimux_core::process_items(&prober, &transcoder, &config)
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let started = Instant::now();
    info!("Run started: {}", logging::run_timestamp());

    match run(&cli) {
        Ok(report) => {
            output::print_summary(&report);
            info!(
                "Run finished in {}",
                bilimux_core::format_duration(started.elapsed())
            );
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".bright_red().bold(), e);
            process::exit(1);
        }
    }
}
