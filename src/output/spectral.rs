//! CSV rendering of spectrograms and periodograms.
//!
//! Spectrograms are written wide: one row per frame, a `time_s` column, then
//! one column per frequency bin. Periodograms are written long with a
//! `frequency_hz,density` pair per bin. The periodogram renderer also covers
//! the whole recording so the clip can be seen against the full night.

use crate::audio::Signal;
use crate::constants::output_suffixes::{
    PSD_AFTER, PSD_BEFORE, PSD_RECORDING, SPECTROGRAM_AFTER, SPECTROGRAM_BEFORE,
};
use crate::dsp::{periodogram, spectrogram};
use crate::error::{Error, Result};
use crate::output::{Renderer, artifact_path};
use crate::pipeline::ProcessedResult;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Writes before and after spectrograms.
#[derive(Debug, Clone, Copy)]
pub struct SpectrogramRenderer {
    nfft: usize,
}

impl SpectrogramRenderer {
    /// Create a renderer using `nfft`-sample frames.
    #[must_use]
    pub const fn new(nfft: usize) -> Self {
        Self { nfft }
    }
}

impl Renderer for SpectrogramRenderer {
    fn name(&self) -> &'static str {
        "spectrogram"
    }

    fn render(&self, result: &ProcessedResult, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let stem = &result.original_filename_stem;
        let before = artifact_path(output_dir, stem, SPECTROGRAM_BEFORE);
        let after = artifact_path(output_dir, stem, SPECTROGRAM_AFTER);

        write_spectrogram(&before, &result.pre_filter_signal, self.nfft)?;
        write_spectrogram(&after, &result.post_pipeline_signal, self.nfft)?;

        Ok(vec![before, after])
    }
}

/// Writes before and after periodograms plus one of the whole recording.
#[derive(Debug, Clone, Copy, Default)]
pub struct PsdRenderer;

impl Renderer for PsdRenderer {
    fn name(&self) -> &'static str {
        "psd"
    }

    fn render(&self, result: &ProcessedResult, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let stem = &result.original_filename_stem;
        let before = artifact_path(output_dir, stem, PSD_BEFORE);
        let after = artifact_path(output_dir, stem, PSD_AFTER);
        let recording = artifact_path(output_dir, stem, PSD_RECORDING);

        write_periodogram(&before, &result.pre_filter_signal)?;
        write_periodogram(&after, &result.post_pipeline_signal)?;
        write_periodogram(&recording, &result.recording_signal)?;

        Ok(vec![before, after, recording])
    }
}

#[derive(Serialize)]
struct PsdRow {
    frequency_hz: f64,
    density: f64,
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> Error + '_ {
    move |source| Error::CsvWriteFailed {
        path: path.to_path_buf(),
        source,
    }
}

fn write_spectrogram(path: &Path, signal: &Signal, nfft: usize) -> Result<()> {
    let spec = spectrogram(signal, nfft)?;
    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;

    let header = std::iter::once("time_s".to_string())
        .chain(spec.frequencies.iter().map(ToString::to_string));
    writer.write_record(header).map_err(csv_error(path))?;

    for (time, frame) in spec.times.iter().zip(&spec.power) {
        let row = std::iter::once(time.to_string()).chain(frame.iter().map(ToString::to_string));
        writer.write_record(row).map_err(csv_error(path))?;
    }

    writer.flush()?;
    Ok(())
}

fn write_periodogram(path: &Path, signal: &Signal) -> Result<()> {
    let psd = periodogram(signal)?;
    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;

    for (&frequency_hz, &density) in psd.frequencies.iter().zip(&psd.density) {
        writer
            .serialize(PsdRow {
                frequency_hz,
                density,
            })
            .map_err(csv_error(path))?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use tempfile::TempDir;

    fn tone(rate: u32, len: usize) -> Signal {
        let samples = (0..len)
            .map(|i| (2.0 * PI * 1_000.0 * i as f64 / f64::from(rate)).sin())
            .collect();
        Signal::new(samples, rate).unwrap()
    }

    fn result() -> ProcessedResult {
        ProcessedResult {
            original_filename_stem: "night".to_string(),
            recording_signal: tone(16_000, 4_096),
            pre_filter_signal: tone(16_000, 2_048),
            post_pipeline_signal: tone(8_000, 1_024),
            clip_index: 0,
            clip_count: 1,
            clip_start_secs: 0.0,
            dropped_samples: 0,
        }
    }

    #[test]
    fn test_spectrogram_csv_layout() {
        let dir = TempDir::new().unwrap();
        let paths = SpectrogramRenderer::new(256)
            .render(&result(), dir.path())
            .unwrap();
        assert!(paths[0].ends_with("night_before_spectrogram.csv"));

        let mut reader = csv::Reader::from_path(&paths[0]).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 1 + 129);
        assert_eq!(&headers[0], "time_s");
        assert_eq!(&headers[1], "0");

        // (2048 - 256) / 128 + 1 frames
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 15);
        assert!(rows.iter().all(|r| r.len() == 130));
    }

    #[test]
    fn test_psd_csv_rows() {
        let dir = TempDir::new().unwrap();
        let paths = PsdRenderer.render(&result(), dir.path()).unwrap();
        assert!(paths[1].ends_with("night_after_psd.csv"));

        let mut reader = csv::Reader::from_path(&paths[1]).unwrap();
        let headers: Vec<_> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, vec!["frequency_hz", "density"]);

        let rows: Vec<(f64, f64)> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 513);
        let peak = rows
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert!((peak.0 - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_psd_covers_whole_recording() {
        let dir = TempDir::new().unwrap();
        let paths = PsdRenderer.render(&result(), dir.path()).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[2].ends_with("night_recording_psd.csv"));

        // 4096 samples at 16 kHz give 2049 bins, twice the clip's resolution
        let mut reader = csv::Reader::from_path(&paths[2]).unwrap();
        let rows: Vec<(f64, f64)> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2_049);
        assert!((rows[1].0 - 3.906_25).abs() < 1e-9);
    }
}
