//! Sample buffers passed between pipeline stages.

use crate::error::DspError;

/// Mono samples at a fixed sample rate.
///
/// Stages never mutate a `Signal` they receive; each returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Signal {
    /// Wrap samples recorded at `sample_rate` Hz.
    ///
    /// # Errors
    ///
    /// Returns [`DspError::InvalidRate`] if `sample_rate` is zero.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, DspError> {
        if sample_rate == 0 {
            return Err(DspError::InvalidRate { rate: sample_rate });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Sample values.
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz.
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the signal holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Consume the signal and return its samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// A decoded recording ready for the pipeline.
#[derive(Debug, Clone)]
pub struct Recording {
    /// File name without extension, carried through to the renderers.
    pub stem: String,
    /// Full-length recording at its native rate.
    pub signal: Signal,
}
