//! Renderer trait and artifact naming.

use crate::config::{Config, OutputFormat};
use crate::constants::output_suffixes::{
    PSD_AFTER, PSD_BEFORE, PSD_RECORDING, SPECTROGRAM_AFTER, SPECTROGRAM_BEFORE, SUMMARY,
    WAV_AFTER, WAV_BEFORE,
};
use crate::error::Result;
use crate::output::{PsdRenderer, SpectrogramRenderer, SummaryRenderer, WavRenderer};
use crate::pipeline::ProcessedResult;
use std::path::{Path, PathBuf};

/// Trait for turning a pipeline result into files on disk.
pub trait Renderer {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Write this renderer's artifacts into `output_dir`.
    ///
    /// Returns the paths written, in before/after order where applicable.
    /// Extra views follow the before/after pair.
    fn render(&self, result: &ProcessedResult, output_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// File name suffixes a format produces, appended to the recording stem.
#[must_use]
pub const fn artifact_suffixes(format: OutputFormat) -> &'static [&'static str] {
    match format {
        OutputFormat::Wav => &[WAV_BEFORE, WAV_AFTER],
        OutputFormat::Spectrogram => &[SPECTROGRAM_BEFORE, SPECTROGRAM_AFTER],
        OutputFormat::Psd => &[PSD_BEFORE, PSD_AFTER, PSD_RECORDING],
        OutputFormat::Summary => &[SUMMARY],
    }
}

/// Path of one artifact for a recording stem.
#[must_use]
pub fn artifact_path(output_dir: &Path, stem: &str, suffix: &str) -> PathBuf {
    output_dir.join(format!("{stem}{suffix}"))
}

/// Build the renderers for every configured output format.
#[must_use]
pub fn renderers_for(config: &Config) -> Vec<Box<dyn Renderer>> {
    config
        .output
        .formats
        .iter()
        .map(|format| -> Box<dyn Renderer> {
            match format {
                OutputFormat::Wav => Box::new(WavRenderer),
                OutputFormat::Spectrogram => Box::new(SpectrogramRenderer::new(config.output.nfft)),
                OutputFormat::Psd => Box::new(PsdRenderer),
                OutputFormat::Summary => Box::new(SummaryRenderer::new(config.pipeline.clone())),
            }
        })
        .collect()
}
