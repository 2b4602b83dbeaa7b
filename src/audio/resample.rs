//! Sample-rate conversion.
//!
//! The default method reconstructs the whole spectrum with one forward FFT and
//! truncates or zero-extends it to the new length before transforming back.
//! The streaming method runs rubato's FFT resampler over fixed chunks and is
//! kept for inputs where holding a full-length complex spectrum is too costly.

use crate::audio::Signal;
use crate::constants::streaming;
use crate::error::DspError;
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resampling algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMethod {
    /// Whole-signal frequency-domain interpolation.
    #[default]
    Spectral,
    /// Chunked FFT resampling via rubato.
    Streaming,
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spectral => write!(f, "spectral"),
            Self::Streaming => write!(f, "streaming"),
        }
    }
}

impl std::str::FromStr for ResampleMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spectral" | "fft" => Ok(Self::Spectral),
            "streaming" | "rubato" => Ok(Self::Streaming),
            other => Err(format!("unknown resample method: {other}")),
        }
    }
}

/// Resample a signal to `target_rate` Hz.
///
/// The output has `round(len * target_rate / sample_rate)` samples and its
/// rate is exactly `target_rate`. A signal already at the target rate is
/// returned unchanged.
///
/// # Errors
///
/// Returns [`DspError::InvalidRate`] if `target_rate` is zero, or
/// [`DspError::Resample`] if the streaming resampler fails.
pub fn resample(
    signal: &Signal,
    target_rate: u32,
    method: ResampleMethod,
) -> Result<Signal, DspError> {
    if target_rate == 0 {
        return Err(DspError::InvalidRate { rate: target_rate });
    }

    let from_rate = signal.sample_rate();
    if from_rate == target_rate {
        return Ok(signal.clone());
    }

    let out_len = output_len(signal.len(), from_rate, target_rate);
    debug!(
        "Resampling {} samples from {} Hz to {} Hz ({} samples, {})",
        signal.len(),
        from_rate,
        target_rate,
        out_len,
        method
    );

    let samples = if signal.is_empty() {
        Vec::new()
    } else {
        match method {
            ResampleMethod::Spectral => resample_spectral(signal.samples(), out_len),
            ResampleMethod::Streaming => {
                resample_streaming(signal.samples(), from_rate, target_rate, out_len)?
            }
        }
    };

    Signal::new(samples, target_rate)
}

/// Output length for a rate change, `round(len * to / from)` with halves
/// rounded up.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn output_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    let numerator = 2 * input_len as u128 * u128::from(to_rate) + u128::from(from_rate);
    (numerator / (2 * u128::from(from_rate))) as usize
}

/// Fourier-method resampling of `x` to `num` samples.
///
/// For an even retained bandwidth the Nyquist bin is folded on downsampling
/// and split between the positive and negative halves on upsampling so the
/// result stays real.
#[allow(clippy::cast_precision_loss)]
fn resample_spectral(x: &[f64], num: usize) -> Vec<f64> {
    let nx = x.len();
    if num == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();

    let mut spectrum: Vec<Complex<f64>> = x.iter().map(|&v| Complex::new(v, 0.0)).collect();
    planner.plan_fft_forward(nx).process(&mut spectrum);

    let n = num.min(nx);
    let nyq = n / 2 + 1;
    let mut resized = vec![Complex::new(0.0, 0.0); num];

    // DC and positive frequencies (includes +n/2 when n is even)
    resized[..nyq].copy_from_slice(&spectrum[..nyq]);

    // Negative frequencies
    let negative = n - nyq;
    if negative > 0 {
        resized[num - negative..].copy_from_slice(&spectrum[nx - negative..]);
    }

    if n % 2 == 0 {
        let half = n / 2;
        if num < nx {
            resized[half] += spectrum[nx - half];
        } else if nx < num {
            resized[half] *= 0.5;
            resized[num - half] = resized[half];
        }
    }

    planner.plan_fft_inverse(num).process(&mut resized);

    let scale = 1.0 / nx as f64;
    resized.iter().map(|c| c.re * scale).collect()
}

/// Chunked rubato resampling trimmed to `out_len`.
///
/// The resampler's output delay is discarded, and zero chunks are fed after
/// the input runs out until `out_len` aligned frames exist.
fn resample_streaming(
    samples: &[f64],
    from_rate: u32,
    to_rate: u32,
    out_len: usize,
) -> Result<Vec<f64>, DspError> {
    let channels = 1;

    let mut resampler = Fft::<f64>::new(
        from_rate as usize,
        to_rate as usize,
        streaming::CHUNK_SIZE,
        streaming::SUB_CHUNKS,
        channels,
        FixedSync::Both,
    )
    .map_err(|e| DspError::Resample {
        reason: e.to_string(),
    })?;

    let frames_needed = resampler.input_frames_next();
    let delay = resampler.output_delay();
    let wanted = out_len + delay;
    let mut output = Vec::with_capacity(wanted + resampler.output_frames_next());

    let mut chunks = samples.chunks(frames_needed);
    let mut padded = vec![0.0; frames_needed];
    while output.len() < wanted {
        // Partial and post-input chunks are zero-padded to the fixed input size
        let chunk = match chunks.next() {
            Some(chunk) if chunk.len() == frames_needed => chunk,
            Some(chunk) => {
                padded.fill(0.0);
                padded[..chunk.len()].copy_from_slice(chunk);
                padded.as_slice()
            }
            None => {
                padded.fill(0.0);
                padded.as_slice()
            }
        };

        let input = SequentialSlice::new(chunk, channels, frames_needed).map_err(|e| {
            DspError::Resample {
                reason: format!("failed to create input adapter: {e}"),
            }
        })?;

        let resampled = resampler
            .process(&input, 0, None)
            .map_err(|e| DspError::Resample {
                reason: e.to_string(),
            })?;

        output.extend_from_slice(&resampled.take_data());
    }

    debug!("Discarding {} frames of resampler delay", delay);
    output.drain(..delay);
    output.truncate(out_len);
    Ok(output)
}
