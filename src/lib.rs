//! Batcall - ultrasonic bat recording preparation tool.
//!
//! Splits recordings into fixed-length clips, picks one, band-pass filters it
//! with a Butterworth IIR and resamples it to an audible rate. Before and
//! after views are written as WAV, spectrogram and periodogram files.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dsp;
pub mod error;
pub mod output;
pub mod pipeline;

use clap::Parser;
use cli::{Cli, Command, ConfigAction, ProcessArgs};
use config::{Config, config_file_path, load_default_config, save_default_config, validate_config};
use pipeline::{ProcessCheck, collect_input_files, output_dir_for, process_file, should_process};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the batcall CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.process.verbose, cli.process.quiet);

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.inputs.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    let config = load_default_config()?;
    process_files(&cli.inputs, &cli.process, config)
}

/// Process input files with the given options.
fn process_files(inputs: &[PathBuf], args: &ProcessArgs, mut config: Config) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    info!("Found {} audio file(s) to process", files.len());

    args.apply_to(&mut config);
    validate_config(&config)?;

    let pipeline = &config.pipeline;
    info!(
        "Band-pass {:.0}-{:.0} Hz (order {}), {:.1}s clips, output {} Hz via {}",
        pipeline.low_cutoff_hz,
        pipeline.high_cutoff_hz,
        pipeline.filter_order,
        pipeline.clip_seconds,
        pipeline.target_rate,
        pipeline.resampler
    );

    let file_progress = progress::create_file_progress(files.len(), args.progress_enabled());

    let mut processed = 0;
    let mut skipped = 0;
    let mut errors = 0;
    let mut total_audio_secs = 0.0;

    for file in &files {
        let file_output_dir = output_dir_for(file, args.output_dir.as_deref());
        progress::set_current_file(file_progress.as_ref(), file);

        if should_process(file, &file_output_dir, &config.output.formats, args.force)
            == ProcessCheck::SkipExists
        {
            info!("Skipping (output exists): {}", file.display());
            skipped += 1;
            progress::inc_progress(file_progress.as_ref());
            continue;
        }

        match process_file(file, &file_output_dir, &config) {
            Ok(result) => {
                processed += 1;
                total_audio_secs += result.audio_duration_secs;
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} processed, {} skipped, {} errors, {:.1}s of audio in {:.2}s",
        processed, skipped, errors, total_audio_secs, total_duration
    );

    if errors > 0 {
        warn!("{} file(s) had errors", errors);
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // Decoder probing is noisy, so symphonia stays at warn until -vv.
    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info,symphonia=warn",
            1 => "debug,symphonia=warn",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let text = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{text}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
