//! Single file processing: decode, run the signal chain, render artifacts.

use crate::audio::load_recording;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::renderers_for;
use crate::pipeline::process;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Process a single recording and write every configured artifact.
///
/// # Arguments
///
/// * `input_path` - Path to the recording
/// * `output_dir` - Directory for artifacts, created if missing
/// * `config` - Pipeline and output settings
pub fn process_file(input_path: &Path, output_dir: &Path, config: &Config) -> Result<ProcessResult> {
    let start_time = Instant::now();

    info!("Processing: {}", input_path.display());

    let recording = load_recording(input_path)?;
    let audio_duration_secs = recording.signal.duration_secs();
    debug!(
        "Decoded {:.1}s at {} Hz",
        audio_duration_secs,
        recording.signal.sample_rate()
    );

    let result = process(recording, &config.pipeline)?;
    info!(
        "Clip {}/{} at {:.1}s, {} -> {} Hz",
        result.clip_index + 1,
        result.clip_count,
        result.clip_start_secs,
        result.pre_filter_signal.sample_rate(),
        result.post_pipeline_signal.sample_rate()
    );

    std::fs::create_dir_all(output_dir).map_err(|e| Error::OutputDirCreateFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let mut artifacts = Vec::new();
    for renderer in renderers_for(config) {
        debug!("Rendering {}", renderer.name());
        artifacts.extend(renderer.render(&result, output_dir)?);
    }

    let duration_secs = start_time.elapsed().as_secs_f64();
    let realtime_factor = if duration_secs > 0.0 {
        audio_duration_secs / duration_secs
    } else {
        0.0
    };
    info!(
        "Wrote {} files in {:.2}s ({:.1}x realtime)",
        artifacts.len(),
        duration_secs,
        realtime_factor
    );

    Ok(ProcessResult {
        artifacts,
        clip_index: result.clip_index,
        clip_count: result.clip_count,
        duration_secs,
        audio_duration_secs,
    })
}

/// Result of processing a single file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Files written for this recording.
    pub artifacts: Vec<PathBuf>,
    /// Index of the selected clip.
    pub clip_index: usize,
    /// Number of clips in the recording.
    pub clip_count: usize,
    /// Processing duration in seconds.
    pub duration_secs: f64,
    /// Audio duration in seconds.
    pub audio_duration_secs: f64,
}
