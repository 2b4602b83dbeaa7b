//! Per-recording signal chain: segment, select one clip, band-pass, resample.
//!
//! Everything here is a pure function of its inputs. No state is shared
//! between calls, so recordings can be processed on separate threads with
//! different configurations.

use crate::audio::{Clip, Recording, Signal, resample, split_into_clips};
use crate::config::PipelineConfig;
use crate::dsp::{FilterSpec, apply, apply_zero_phase, design_bandpass};
use crate::error::{DspError, Error, Result, Stage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// How one clip is chosen from a segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipSelection {
    /// Uniformly random clip; seeded runs are reproducible.
    Random {
        /// Seed for the generator, or `None` for OS entropy.
        seed: Option<u64>,
    },
    /// Always the clip at this index.
    Index(usize),
}

impl Default for ClipSelection {
    fn default() -> Self {
        Self::Random { seed: None }
    }
}

impl ClipSelection {
    /// Pick one clip, drawing from `rng` for random selection.
    ///
    /// # Errors
    ///
    /// - [`DspError::EmptyClipSet`] if `clips` is empty.
    /// - [`DspError::ClipIndexOutOfRange`] if a fixed index does not exist.
    pub fn select<R: Rng + ?Sized>(
        self,
        clips: Vec<Clip>,
        rng: &mut R,
    ) -> std::result::Result<Clip, DspError> {
        if clips.is_empty() {
            return Err(DspError::EmptyClipSet);
        }

        let count = clips.len();
        let index = match self {
            Self::Index(index) => index,
            Self::Random { .. } => rng.random_range(0..count),
        };

        clips
            .into_iter()
            .nth(index)
            .ok_or(DspError::ClipIndexOutOfRange { index, count })
    }

    fn rng(self) -> StdRng {
        match self {
            Self::Random { seed: Some(seed) } => StdRng::seed_from_u64(seed),
            _ => StdRng::from_os_rng(),
        }
    }
}

/// Pick one clip uniformly at random.
///
/// # Errors
///
/// Returns [`DspError::EmptyClipSet`] if `clips` is empty.
pub fn select_clip<R: Rng + ?Sized>(
    clips: Vec<Clip>,
    rng: &mut R,
) -> std::result::Result<Clip, DspError> {
    ClipSelection::default().select(clips, rng)
}

/// Output of one pipeline run, handed to the renderers.
#[derive(Debug, Clone)]
pub struct ProcessedResult {
    /// Recording file name without extension.
    pub original_filename_stem: String,
    /// Whole recording at its native rate, including any dropped tail.
    pub recording_signal: Signal,
    /// Selected clip at the recording's native rate, before filtering.
    pub pre_filter_signal: Signal,
    /// Selected clip after band-pass filtering and resampling.
    pub post_pipeline_signal: Signal,
    /// Index of the selected clip.
    pub clip_index: usize,
    /// Number of clips the recording was split into.
    pub clip_count: usize,
    /// Start of the selected clip within the recording, in seconds.
    pub clip_start_secs: f64,
    /// Trailing samples discarded by segmentation.
    pub dropped_samples: usize,
}

fn at(stage: Stage) -> impl FnOnce(DspError) -> Error {
    move |source| Error::Stage { stage, source }
}

/// Run the pipeline on one recording.
///
/// Random clip selection draws from a generator seeded by
/// `cfg.seed`, or from OS entropy when no seed is configured.
///
/// # Errors
///
/// Returns [`Error::Stage`] naming the failing stage, wrapping the unchanged
/// [`DspError`].
pub fn process(recording: Recording, cfg: &PipelineConfig) -> Result<ProcessedResult> {
    let selection = cfg.clip_selection();
    let mut rng = selection.rng();
    run(recording, cfg, selection, &mut rng)
}

/// Run the pipeline with a caller-supplied random source.
///
/// A configured `clip_index` still takes precedence over `rng`.
///
/// # Errors
///
/// Returns [`Error::Stage`] naming the failing stage, wrapping the unchanged
/// [`DspError`].
pub fn process_with_rng<R: Rng + ?Sized>(
    recording: Recording,
    cfg: &PipelineConfig,
    rng: &mut R,
) -> Result<ProcessedResult> {
    run(recording, cfg, cfg.clip_selection(), rng)
}

fn run<R: Rng + ?Sized>(
    recording: Recording,
    cfg: &PipelineConfig,
    selection: ClipSelection,
    rng: &mut R,
) -> Result<ProcessedResult> {
    let Recording { stem, signal } = recording;
    let source_rate = signal.sample_rate();

    let segmentation = split_into_clips(&signal, cfg.clip_seconds).map_err(at(Stage::Segment))?;
    let clip_count = segmentation.clips.len();
    debug!(
        "{}: {} clips, {} samples dropped",
        stem, clip_count, segmentation.dropped_samples
    );

    let clip = selection
        .select(segmentation.clips, rng)
        .map_err(at(Stage::Select))?;
    debug!(
        "{}: selected clip {} ({:.2}s-{:.2}s)",
        stem,
        clip.index,
        clip.start_secs(),
        clip.end_secs()
    );

    let spec = FilterSpec {
        low_cutoff_hz: cfg.low_cutoff_hz,
        high_cutoff_hz: cfg.high_cutoff_hz,
        sample_rate_hz: source_rate,
        order: cfg.filter_order,
    };
    let coeffs = design_bandpass(&spec).map_err(at(Stage::Design))?;

    let filtered = if cfg.zero_phase {
        apply_zero_phase(&clip.signal, &coeffs)
    } else {
        apply(&clip.signal, &coeffs)
    }
    .map_err(at(Stage::Filter))?;

    let resampled =
        resample(&filtered, cfg.target_rate, cfg.resampler).map_err(at(Stage::Resample))?;

    let clip_start_secs = clip.start_secs();
    Ok(ProcessedResult {
        original_filename_stem: stem,
        recording_signal: signal,
        pre_filter_signal: clip.signal,
        post_pipeline_signal: resampled,
        clip_index: clip.index,
        clip_count,
        clip_start_secs,
        dropped_samples: segmentation.dropped_samples,
    })
}
