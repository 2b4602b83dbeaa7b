//! Error types for batcall.

use std::fmt;

/// Result type alias for batcall operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Precondition failures raised by the signal-processing stages.
///
/// Every variant is deterministic: re-running the same input fails the same
/// way, so none of them is worth retrying.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DspError {
    /// Band-pass filter parameters are out of range.
    #[error(
        "invalid filter spec: {reason} (low={low_cutoff_hz} Hz, high={high_cutoff_hz} Hz, \
         rate={sample_rate_hz} Hz, order={order})"
    )]
    InvalidSpec {
        /// Requested lower band edge.
        low_cutoff_hz: f64,
        /// Requested upper band edge.
        high_cutoff_hz: f64,
        /// Sample rate the filter was designed for.
        sample_rate_hz: u32,
        /// Requested filter order.
        order: usize,
        /// Which constraint was violated.
        reason: &'static str,
    },

    /// Input signal has no samples.
    #[error("signal is empty")]
    EmptySignal,

    /// Signal does not contain a single whole clip.
    #[error(
        "signal too short: {samples} samples at {sample_rate} Hz ({duration_secs:.3}s) \
         is shorter than one {clip_seconds}s clip"
    )]
    SignalTooShort {
        /// Number of samples in the signal.
        samples: usize,
        /// Sample rate of the signal.
        sample_rate: u32,
        /// Signal duration in seconds.
        duration_secs: f64,
        /// Requested clip duration in seconds.
        clip_seconds: f64,
    },

    /// No clips to select from.
    #[error("no clips to select from")]
    EmptyClipSet,

    /// Sample rate is zero.
    #[error("invalid sample rate: {rate} Hz (must be > 0)")]
    InvalidRate {
        /// Offending rate.
        rate: u32,
    },

    /// Clip duration is not finite, not positive, or shorter than one sample.
    #[error("invalid clip duration: {seconds}s (must be positive and span at least one sample)")]
    InvalidClipDuration {
        /// Offending duration.
        seconds: f64,
    },

    /// Fixed clip index does not exist.
    #[error("clip index {index} out of range ({count} clips available)")]
    ClipIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of clips produced.
        count: usize,
    },

    /// FFT size is too small for spectral analysis.
    #[error("invalid FFT size: {nfft} (must be at least 2)")]
    InvalidFftSize {
        /// Offending size.
        nfft: usize,
    },

    /// Streaming resampler failed.
    #[error("failed to resample audio: {reason}")]
    Resample {
        /// Description of the resampling failure.
        reason: String,
    },
}

/// Pipeline stage, recorded alongside a failure for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Splitting the recording into clips.
    Segment,
    /// Choosing one clip.
    Select,
    /// Computing band-pass coefficients.
    Design,
    /// Applying the band-pass filter.
    Filter,
    /// Converting to the output sample rate.
    Resample,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segment => write!(f, "segment"),
            Self::Select => write!(f, "select"),
            Self::Design => write!(f, "design"),
            Self::Filter => write!(f, "filter"),
            Self::Resample => write!(f, "resample"),
        }
    }
}

/// Top-level error type for batcall.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A pipeline stage rejected its input.
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Stage that failed.
        stage: Stage,
        /// Unchanged stage error.
        #[source]
        source: DspError,
    },

    /// A signal could not be constructed or analysed outside the pipeline.
    #[error(transparent)]
    Dsp(#[from] DspError),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// No valid audio files found.
    #[error("no valid audio files found in the provided paths")]
    NoValidAudioFiles,

    /// Failed to open audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio from '{path}'")]
    AudioDecode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Failed to write WAV file.
    #[error("failed to write WAV file '{path}'")]
    WavWriteFailed {
        /// Path to the WAV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: hound::Error,
    },

    /// Failed to write CSV file.
    #[error("failed to write CSV file '{path}'")]
    CsvWriteFailed {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// Failed to write JSON output file.
    #[error("failed to write JSON output file '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Stage and core error, if this failure came from a pipeline stage.
    #[must_use]
    pub fn stage_error(&self) -> Option<(Stage, &DspError)> {
        match self {
            Self::Stage { stage, source } => Some((*stage, source)),
            _ => None,
        }
    }
}
