//! JSON summary of one pipeline run.

use crate::audio::Signal;
use crate::config::PipelineConfig;
use crate::constants::output_suffixes::SUMMARY;
use crate::error::{Error, Result};
use crate::output::{Renderer, artifact_path};
use crate::pipeline::ProcessedResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Summary file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunSummary {
    /// Recording file stem.
    pub recording: String,
    /// Index of the selected clip.
    pub clip_index: usize,
    /// Number of clips the recording was split into.
    pub clip_count: usize,
    /// Start of the selected clip in seconds.
    pub clip_start_secs: f64,
    /// Trailing samples discarded by segmentation.
    pub dropped_samples: usize,
    /// Clip statistics before filtering.
    pub before: SignalStats,
    /// Clip statistics after filtering and resampling.
    pub after: SignalStats,
    /// Settings the run used.
    pub pipeline: PipelineConfig,
}

/// Basic level statistics for one signal.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignalStats {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub samples: usize,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Largest absolute sample value.
    pub peak: f64,
    /// Root mean square level.
    pub rms: f64,
}

impl SignalStats {
    #[allow(clippy::cast_precision_loss)]
    fn of(signal: &Signal) -> Self {
        let samples = signal.samples();
        let peak = samples.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        let rms = if samples.is_empty() {
            0.0
        } else {
            (samples.iter().map(|x| x * x).sum::<f64>() / samples.len() as f64).sqrt()
        };

        Self {
            sample_rate: signal.sample_rate(),
            samples: samples.len(),
            duration_secs: signal.duration_secs(),
            peak,
            rms,
        }
    }
}

impl RunSummary {
    /// Summarize a result produced with `pipeline`.
    #[must_use]
    pub fn new(result: &ProcessedResult, pipeline: &PipelineConfig) -> Self {
        Self {
            recording: result.original_filename_stem.clone(),
            clip_index: result.clip_index,
            clip_count: result.clip_count,
            clip_start_secs: result.clip_start_secs,
            dropped_samples: result.dropped_samples,
            before: SignalStats::of(&result.pre_filter_signal),
            after: SignalStats::of(&result.post_pipeline_signal),
            pipeline: pipeline.clone(),
        }
    }
}

/// Writes `<stem>.summary.json`.
#[derive(Debug, Clone)]
pub struct SummaryRenderer {
    pipeline: PipelineConfig,
}

impl SummaryRenderer {
    /// Create a renderer recording the given settings alongside each result.
    #[must_use]
    pub const fn new(pipeline: PipelineConfig) -> Self {
        Self { pipeline }
    }
}

impl Renderer for SummaryRenderer {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn render(&self, result: &ProcessedResult, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = artifact_path(output_dir, &result.original_filename_stem, SUMMARY);
        let summary = RunSummary::new(result, &self.pipeline);

        let file = File::create(&path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary).map_err(|e| {
            Error::JsonWrite {
                path: path.clone(),
                source: e,
            }
        })?;

        Ok(vec![path])
    }
}
