//! Spectrogram and periodogram estimates for before/after views.
//!
//! Both use one-sided power spectral density scaling (V**2/Hz) with the
//! segment mean removed before windowing.

use crate::audio::Signal;
use crate::constants::spectrum::MIN_NFFT;
use crate::error::DspError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;

/// Short-time power spectral density.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Bin centre frequencies in Hz.
    pub frequencies: Vec<f64>,
    /// Frame centre times in seconds.
    pub times: Vec<f64>,
    /// Density per frame, `power[frame][bin]`.
    pub power: Vec<Vec<f64>>,
}

/// Whole-signal power spectral density.
#[derive(Debug, Clone)]
pub struct Periodogram {
    /// Bin frequencies in Hz.
    pub frequencies: Vec<f64>,
    /// Density per bin.
    pub density: Vec<f64>,
}

/// Hann-windowed spectrogram with `nfft`-sample frames and 50% overlap.
///
/// A signal shorter than `nfft` is zero-padded into a single frame.
///
/// # Errors
///
/// Returns [`DspError::InvalidFftSize`] if `nfft < 2` or
/// [`DspError::EmptySignal`] if the signal has no samples.
#[allow(clippy::cast_precision_loss)]
pub fn spectrogram(signal: &Signal, nfft: usize) -> Result<Spectrogram, DspError> {
    if nfft < MIN_NFFT {
        return Err(DspError::InvalidFftSize { nfft });
    }
    if signal.is_empty() {
        return Err(DspError::EmptySignal);
    }

    let rate = f64::from(signal.sample_rate());
    let samples = signal.samples();
    let hop = nfft - nfft / 2;
    let window = hann(nfft);
    let fft = FftPlanner::<f64>::new().plan_fft_forward(nfft);

    let frame_count = if samples.len() < nfft {
        1
    } else {
        (samples.len() - nfft) / hop + 1
    };

    let mut times = Vec::with_capacity(frame_count);
    let mut power = Vec::with_capacity(frame_count);
    for frame in 0..frame_count {
        let start = frame * hop;
        let end = (start + nfft).min(samples.len());
        power.push(one_sided_density(
            &samples[start..end],
            &window,
            fft.as_ref(),
            rate,
        ));
        times.push((start + nfft / 2) as f64 / rate);
    }

    Ok(Spectrogram {
        frequencies: bin_frequencies(nfft, rate),
        times,
        power,
    })
}

/// Boxcar-windowed periodogram over the whole signal.
///
/// # Errors
///
/// Returns [`DspError::EmptySignal`] if the signal has no samples.
pub fn periodogram(signal: &Signal) -> Result<Periodogram, DspError> {
    if signal.is_empty() {
        return Err(DspError::EmptySignal);
    }

    let rate = f64::from(signal.sample_rate());
    let n = signal.len();
    let window = vec![1.0; n];
    let fft = FftPlanner::<f64>::new().plan_fft_forward(n);

    Ok(Periodogram {
        frequencies: bin_frequencies(n, rate),
        density: one_sided_density(signal.samples(), &window, fft.as_ref(), rate),
    })
}

/// Periodic Hann window.
#[allow(clippy::cast_precision_loss)]
fn hann(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / len as f64).cos())
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn bin_frequencies(nfft: usize, rate: f64) -> Vec<f64> {
    (0..=nfft / 2).map(|k| k as f64 * rate / nfft as f64).collect()
}

/// Density of one frame; `segment` may be shorter than the window and is
/// zero-padded.
#[allow(clippy::cast_precision_loss)]
fn one_sided_density(
    segment: &[f64],
    window: &[f64],
    fft: &dyn Fft<f64>,
    rate: f64,
) -> Vec<f64> {
    let nfft = window.len();
    let mean = segment.iter().sum::<f64>() / segment.len() as f64;

    let mut buffer: Vec<Complex<f64>> = segment
        .iter()
        .zip(window)
        .map(|(&x, &w)| Complex::new((x - mean) * w, 0.0))
        .collect();
    buffer.resize(nfft, Complex::new(0.0, 0.0));
    fft.process(&mut buffer);

    let scale = 1.0 / (rate * window.iter().map(|w| w * w).sum::<f64>());
    let nyquist_bin = (nfft % 2 == 0).then_some(nfft / 2);

    buffer[..=nfft / 2]
        .iter()
        .enumerate()
        .map(|(k, c)| {
            let density = c.norm_sqr() * scale;
            if k == 0 || Some(k) == nyquist_bin {
                density
            } else {
                2.0 * density
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]
mod tests {
    use super::*;

    fn tone(freq: f64, rate: u32, len: usize, offset: f64) -> Signal {
        let samples = (0..len)
            .map(|i| offset + (2.0 * PI * freq * i as f64 / f64::from(rate)).sin())
            .collect();
        Signal::new(samples, rate).unwrap()
    }

    fn peak_bin(values: &[f64]) -> usize {
        values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_periodogram_peak_and_total_power() {
        // 1 kHz tone over 1024 samples at 8 kHz lands exactly on bin 128
        let signal = tone(1_000.0, 8_000, 1_024, 0.0);
        let psd = periodogram(&signal).unwrap();
        assert_eq!(psd.frequencies.len(), 513);
        assert_eq!(peak_bin(&psd.density), 128);
        assert_eq!(psd.frequencies[128], 1_000.0);

        let df = 8_000.0 / 1_024.0;
        let total: f64 = psd.density.iter().sum::<f64>() * df;
        assert!((total - 0.5).abs() < 1e-9, "total power {total}");
    }

    #[test]
    fn test_periodogram_removes_dc_offset() {
        let signal = tone(1_000.0, 8_000, 1_024, 3.0);
        let psd = periodogram(&signal).unwrap();
        assert!(psd.density[0] < 1e-12);
    }

    #[test]
    fn test_spectrogram_shape() {
        let signal = tone(1_000.0, 8_000, 4_096, 0.0);
        let spec = spectrogram(&signal, 1_024).unwrap();
        assert_eq!(spec.frequencies.len(), 513);
        assert_eq!(spec.times.len(), 7);
        assert_eq!(spec.power.len(), 7);
        assert_eq!(spec.times[0], 512.0 / 8_000.0);
        for frame in &spec.power {
            assert_eq!(frame.len(), 513);
            assert_eq!(peak_bin(frame), 128);
        }
    }

    #[test]
    fn test_spectrogram_short_signal_single_frame() {
        let signal = tone(1_000.0, 8_000, 300, 0.0);
        let spec = spectrogram(&signal, 1_024).unwrap();
        assert_eq!(spec.power.len(), 1);
        assert_eq!(spec.power[0].len(), 513);
    }

    #[test]
    fn test_spectral_errors() {
        let empty = Signal::new(Vec::new(), 8_000).unwrap();
        assert_eq!(spectrogram(&empty, 1_024).unwrap_err(), DspError::EmptySignal);
        assert_eq!(periodogram(&empty).unwrap_err(), DspError::EmptySignal);

        let signal = tone(1_000.0, 8_000, 64, 0.0);
        assert_eq!(
            spectrogram(&signal, 1).unwrap_err(),
            DspError::InvalidFftSize { nfft: 1 }
        );
    }

    #[test]
    fn test_hann_is_periodic() {
        let w = hann(4);
        assert_eq!(w[0], 0.0);
        assert!((w[2] - 1.0).abs() < 1e-12);
        assert!((w[1] - 0.5).abs() < 1e-12);
    }
}
