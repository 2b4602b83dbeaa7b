//! CLI argument definitions.

use crate::audio::ResampleMethod;
use crate::cli::validators::{parse_clip_seconds, parse_frequency};
use crate::config::{Config, OutputFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Band-pass, clip and resample ultrasonic bat recordings.
#[derive(Debug, Parser)]
#[command(name = "batcall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input recordings or directories to process.
    pub inputs: Vec<PathBuf>,

    /// Processing options.
    #[command(flatten)]
    pub process: ProcessArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Options for processing recordings.
///
/// Every pipeline option is optional and overrides the config file when set.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProcessArgs {
    /// Clip duration in seconds.
    #[arg(long, value_parser = parse_clip_seconds, env = "BATCALL_CLIP_SECONDS")]
    pub clip_seconds: Option<f64>,

    /// Lower band-pass edge in Hz.
    #[arg(long, value_parser = parse_frequency, env = "BATCALL_LOW_CUTOFF")]
    pub low_cutoff: Option<f64>,

    /// Upper band-pass edge in Hz (must be below Nyquist of the recording).
    #[arg(long, value_parser = parse_frequency, env = "BATCALL_HIGH_CUTOFF")]
    pub high_cutoff: Option<f64>,

    /// Butterworth filter order.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=32), env = "BATCALL_ORDER")]
    pub order: Option<u32>,

    /// Output sample rate in Hz.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), env = "BATCALL_TARGET_RATE")]
    pub target_rate: Option<u32>,

    /// Seed for the random clip choice.
    #[arg(long, env = "BATCALL_SEED", conflicts_with = "clip")]
    pub seed: Option<u64>,

    /// Always process this clip index instead of a random one.
    #[arg(long, env = "BATCALL_CLIP")]
    pub clip: Option<usize>,

    /// Filter forward and backward for zero phase distortion.
    #[arg(long)]
    pub zero_phase: bool,

    /// Resampling algorithm (spectral, streaming).
    #[arg(long, env = "BATCALL_RESAMPLER")]
    pub resampler: Option<ResampleMethod>,

    /// Output formats (comma-separated: wav,spectrogram,psd,summary).
    #[arg(short, long, value_delimiter = ',', env = "BATCALL_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "BATCALL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// FFT length for spectrogram frames.
    #[arg(long, value_parser = clap::value_parser!(u32).range(2..=1_048_576), env = "BATCALL_NFFT")]
    pub nfft: Option<u32>,

    /// Reprocess files even if output exists.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace including decoder logs).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,
}

impl ProcessArgs {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        let pipeline = &mut config.pipeline;
        if let Some(seconds) = self.clip_seconds {
            pipeline.clip_seconds = seconds;
        }
        if let Some(low) = self.low_cutoff {
            pipeline.low_cutoff_hz = low;
        }
        if let Some(high) = self.high_cutoff {
            pipeline.high_cutoff_hz = high;
        }
        if let Some(order) = self.order {
            pipeline.filter_order = order as usize;
        }
        if let Some(rate) = self.target_rate {
            pipeline.target_rate = rate;
        }
        if let Some(seed) = self.seed {
            pipeline.seed = Some(seed);
            pipeline.clip_index = None;
        }
        if let Some(index) = self.clip {
            pipeline.clip_index = Some(index);
        }
        if self.zero_phase {
            pipeline.zero_phase = true;
        }
        if let Some(method) = self.resampler {
            pipeline.resampler = method;
        }

        if let Some(formats) = &self.format {
            config.output.formats.clone_from(formats);
        }
        if let Some(nfft) = self.nfft {
            config.output.nfft = nfft as usize;
        }
    }

    /// Whether progress bars should be drawn.
    #[must_use]
    pub const fn progress_enabled(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["batcall", "night.wav"]).unwrap();
        assert_eq!(cli.inputs.len(), 1);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "batcall",
            "night.wav",
            "--clip-seconds",
            "2.5",
            "--high-cutoff",
            "95000",
            "--order",
            "4",
            "--resampler",
            "streaming",
            "-f",
            "wav,psd",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.process.clip_seconds, Some(2.5));
        assert_eq!(cli.process.high_cutoff, Some(95_000.0));
        assert_eq!(cli.process.order, Some(4));
        assert_eq!(cli.process.resampler, Some(ResampleMethod::Streaming));
        assert_eq!(
            cli.process.format,
            Some(vec![OutputFormat::Wav, OutputFormat::Psd])
        );
        assert!(cli.process.quiet);
        assert!(!cli.process.progress_enabled());
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["batcall", "a.wav", "--clip-seconds", "0"]).is_err());
        assert!(Cli::try_parse_from(["batcall", "a.wav", "--order", "0"]).is_err());
        assert!(Cli::try_parse_from(["batcall", "a.wav", "--target-rate", "0"]).is_err());
        assert!(Cli::try_parse_from(["batcall", "a.wav", "-f", "png"]).is_err());
        assert!(Cli::try_parse_from(["batcall", "a.wav", "--seed", "1", "--clip", "0"]).is_err());
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["batcall", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }

    #[test]
    fn test_apply_to_overrides_only_given_values() {
        let cli = Cli::try_parse_from([
            "batcall",
            "a.wav",
            "--low-cutoff",
            "8000",
            "--clip",
            "2",
            "--zero-phase",
            "--nfft",
            "512",
        ])
        .unwrap();

        let mut config = Config::default();
        config.pipeline.seed = Some(5);
        cli.process.apply_to(&mut config);

        assert_eq!(config.pipeline.low_cutoff_hz, 8_000.0);
        assert_eq!(config.pipeline.high_cutoff_hz, 191_000.0);
        assert_eq!(config.pipeline.clip_index, Some(2));
        assert_eq!(config.pipeline.seed, Some(5));
        assert!(config.pipeline.zero_phase);
        assert_eq!(config.output.nfft, 512);
        assert_eq!(config.output.formats, vec![OutputFormat::Wav]);
    }

    #[test]
    fn test_seed_override_clears_configured_index() {
        let cli = Cli::try_parse_from(["batcall", "a.wav", "--seed", "9"]).unwrap();
        let mut config = Config::default();
        config.pipeline.clip_index = Some(1);
        cli.process.apply_to(&mut config);
        assert_eq!(config.pipeline.seed, Some(9));
        assert_eq!(config.pipeline.clip_index, None);
    }
}
