//! Configuration type definitions.

use crate::audio::ResampleMethod;
use crate::constants::{
    DEFAULT_CLIP_SECONDS, DEFAULT_FILTER_ORDER, DEFAULT_HIGH_CUTOFF_HZ, DEFAULT_LOW_CUTOFF_HZ,
    DEFAULT_TARGET_RATE, spectrum::DEFAULT_NFFT,
};
use crate::pipeline::ClipSelection;
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Signal-processing settings applied to every recording.
    pub pipeline: PipelineConfig,

    /// Output settings.
    pub output: OutputConfig,
}

/// Settings for one pipeline run.
///
/// Passed explicitly to every invocation so recordings can be processed
/// concurrently with different settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Clip duration in seconds.
    pub clip_seconds: f64,

    /// Lower band-pass edge in Hz.
    pub low_cutoff_hz: f64,

    /// Upper band-pass edge in Hz; must be below Nyquist of the recording.
    pub high_cutoff_hz: f64,

    /// Butterworth order.
    pub filter_order: usize,

    /// Output sample rate in Hz.
    pub target_rate: u32,

    /// Filter forward and backward instead of a single causal pass.
    pub zero_phase: bool,

    /// Resampling algorithm.
    pub resampler: ResampleMethod,

    /// Seed for the random clip choice; unseeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Always pick this clip instead of a random one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_index: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clip_seconds: DEFAULT_CLIP_SECONDS,
            low_cutoff_hz: DEFAULT_LOW_CUTOFF_HZ,
            high_cutoff_hz: DEFAULT_HIGH_CUTOFF_HZ,
            filter_order: DEFAULT_FILTER_ORDER,
            target_rate: DEFAULT_TARGET_RATE,
            zero_phase: false,
            resampler: ResampleMethod::default(),
            seed: None,
            clip_index: None,
        }
    }
}

impl PipelineConfig {
    /// How the pipeline picks one clip; a fixed index wins over a seed.
    #[must_use]
    pub const fn clip_selection(&self) -> ClipSelection {
        match self.clip_index {
            Some(index) => ClipSelection::Index(index),
            None => ClipSelection::Random { seed: self.seed },
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Artifacts written per recording.
    pub formats: Vec<OutputFormat>,

    /// FFT length for spectrogram frames.
    pub nfft: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            formats: vec![OutputFormat::Wav],
            nfft: DEFAULT_NFFT,
        }
    }
}

/// Per-recording output artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Before and after clips as 16-bit WAV.
    Wav,
    /// Before and after spectrograms as CSV.
    Spectrogram,
    /// Before and after periodograms as CSV.
    Psd,
    /// JSON summary of the run.
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wav => write!(f, "wav"),
            Self::Spectrogram => write!(f, "spectrogram"),
            Self::Psd => write!(f, "psd"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wav" | "audio" => Ok(Self::Wav),
            "spectrogram" | "spec" => Ok(Self::Spectrogram),
            "psd" | "periodogram" => Ok(Self::Psd),
            "summary" | "json" => Ok(Self::Summary),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
