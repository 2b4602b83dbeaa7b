//! WAV rendering of the before and after clips.

use crate::constants::output_suffixes::{WAV_AFTER, WAV_BEFORE};
use crate::error::{Error, Result};
use crate::output::{Renderer, artifact_path};
use crate::pipeline::ProcessedResult;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

/// Writes the unfiltered clip and the processed clip as 16-bit mono WAV.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavRenderer;

impl Renderer for WavRenderer {
    fn name(&self) -> &'static str {
        "wav"
    }

    fn render(&self, result: &ProcessedResult, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let stem = &result.original_filename_stem;
        let before = artifact_path(output_dir, stem, WAV_BEFORE);
        let after = artifact_path(output_dir, stem, WAV_AFTER);

        write_wav_file(
            &before,
            result.pre_filter_signal.samples(),
            result.pre_filter_signal.sample_rate(),
        )?;
        write_wav_file(
            &after,
            result.post_pipeline_signal.samples(),
            result.post_pipeline_signal.sample_rate(),
        )?;

        Ok(vec![before, after])
    }
}

/// Write samples to a WAV file, clamping to full scale.
pub fn write_wav_file(path: &Path, samples: &[f64], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let wav_err = |source: hound::Error| Error::WavWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_err)?;
    for &sample in samples {
        writer.write_sample(to_i16(sample)).map_err(wav_err)?;
    }
    writer.finalize().map_err(wav_err)?;

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn to_i16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * f64::from(i16::MAX)) as i16
}
