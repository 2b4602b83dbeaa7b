//! Splitting recordings into equal-length clips.
//!
//! The clip count is the number of whole `clip_seconds` windows that fit in
//! the recording. The samples are then divided evenly between that many
//! clips, so a clip can run longer than `clip_seconds` when the recording is
//! not an exact multiple of it (a 12 s recording with 5 s clips yields two
//! 6 s clips).
//!
//! Known limitation: when the sample count does not divide evenly by the
//! clip count, the trailing `len % clip_count` samples are dropped. They are
//! never padded, duplicated or folded into the last clip. The count is
//! reported by [`Segmentation::dropped_samples`].

use crate::audio::Signal;
use crate::error::DspError;
use tracing::debug;

/// A contiguous slice of a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Position of this clip in the segmentation.
    pub index: usize,
    /// Offset of the first sample in the parent recording.
    pub start_sample: usize,
    /// Clip samples at the parent's sample rate.
    pub signal: Signal,
}

impl Clip {
    /// Start time in seconds within the parent recording.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn start_secs(&self) -> f64 {
        self.start_sample as f64 / f64::from(self.signal.sample_rate())
    }

    /// End time in seconds within the parent recording.
    #[must_use]
    pub fn end_secs(&self) -> f64 {
        self.start_secs() + self.signal.duration_secs()
    }
}

/// Clips produced from one recording.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Clips in recording order.
    pub clips: Vec<Clip>,
    /// Trailing samples that did not fit evenly and were discarded.
    pub dropped_samples: usize,
}

/// Split a signal into equal-length clips of roughly `clip_seconds` each.
///
/// # Errors
///
/// - [`DspError::InvalidClipDuration`] if `clip_seconds` is not a positive
///   finite number, or is shorter than one sample period.
/// - [`DspError::SignalTooShort`] if the signal is shorter than one clip.
pub fn split_into_clips(signal: &Signal, clip_seconds: f64) -> Result<Segmentation, DspError> {
    if !clip_seconds.is_finite() || clip_seconds <= 0.0 {
        return Err(DspError::InvalidClipDuration {
            seconds: clip_seconds,
        });
    }

    let total = signal.len();
    let duration_secs = signal.duration_secs();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clip_count = (duration_secs / clip_seconds).floor() as usize;

    if clip_count == 0 {
        return Err(DspError::SignalTooShort {
            samples: total,
            sample_rate: signal.sample_rate(),
            duration_secs,
            clip_seconds,
        });
    }

    let clip_len = total / clip_count;
    if clip_len == 0 {
        return Err(DspError::InvalidClipDuration {
            seconds: clip_seconds,
        });
    }
    let dropped_samples = total - clip_len * clip_count;
    if dropped_samples > 0 {
        debug!(
            "Dropping {} trailing samples that do not divide into {} clips",
            dropped_samples, clip_count
        );
    }

    let clips = signal.samples()[..clip_len * clip_count]
        .chunks_exact(clip_len)
        .enumerate()
        .map(|(index, chunk)| {
            Signal::new(chunk.to_vec(), signal.sample_rate()).map(|clip_signal| Clip {
                index,
                start_sample: index * clip_len,
                signal: clip_signal,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Segmentation {
        clips,
        dropped_samples,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn ramp(len: usize, rate: u32) -> Signal {
        #[allow(clippy::cast_precision_loss)]
        let samples = (0..len).map(|i| i as f64).collect();
        Signal::new(samples, rate).unwrap()
    }

    #[test]
    fn test_split_exact_multiple() {
        let signal = ramp(100, 10); // 10 seconds
        let result = split_into_clips(&signal, 5.0).unwrap();
        assert_eq!(result.clips.len(), 2);
        assert_eq!(result.dropped_samples, 0);
        assert_eq!(result.clips[0].signal.len(), 50);
        assert_eq!(result.clips[1].start_sample, 50);
        assert_eq!(result.clips[1].signal.samples()[0], 50.0);
    }

    #[test]
    fn test_split_drops_remainder() {
        let signal = ramp(103, 10); // 10.3 seconds, 3 clips of 3.43s
        let result = split_into_clips(&signal, 3.0).unwrap();
        assert_eq!(result.clips.len(), 3);
        assert_eq!(result.dropped_samples, 1);
        for clip in &result.clips {
            assert_eq!(clip.signal.len(), 34);
            assert_eq!(clip.signal.sample_rate(), 10);
        }
        // Last kept sample is 101; sample 102 is dropped.
        let last = result.clips.last().unwrap();
        assert_eq!(*last.signal.samples().last().unwrap(), 101.0);
    }

    #[test]
    fn test_split_clips_longer_than_requested() {
        let signal = ramp(120, 10); // 12 seconds
        let result = split_into_clips(&signal, 5.0).unwrap();
        assert_eq!(result.clips.len(), 2);
        assert_eq!(result.clips[0].signal.len(), 60);
        assert_eq!(result.clips[1].end_secs(), 12.0);
    }

    #[test]
    fn test_split_too_short() {
        let signal = ramp(49, 10);
        let err = split_into_clips(&signal, 5.0).unwrap_err();
        assert!(matches!(err, DspError::SignalTooShort { samples: 49, .. }));
    }

    #[test]
    fn test_split_empty_signal_is_too_short() {
        let signal = Signal::new(Vec::new(), 10).unwrap();
        let err = split_into_clips(&signal, 1.0).unwrap_err();
        assert!(matches!(err, DspError::SignalTooShort { samples: 0, .. }));
    }

    #[test]
    fn test_split_rejects_bad_duration() {
        let signal = ramp(100, 10);
        for seconds in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = split_into_clips(&signal, seconds).unwrap_err();
            assert!(matches!(err, DspError::InvalidClipDuration { .. }));
        }
    }

    #[test]
    fn test_split_rejects_sub_sample_duration() {
        let signal = ramp(10, 10);
        for seconds in [1e-9, 0.05] {
            let err = split_into_clips(&signal, seconds).unwrap_err();
            assert_eq!(err, DspError::InvalidClipDuration { seconds });
        }

        // One sample period is still a valid clip
        let result = split_into_clips(&signal, 0.1).unwrap();
        assert_eq!(result.clips.len(), 10);
        assert!(result.clips.iter().all(|c| c.signal.len() == 1));
    }

    #[test]
    fn test_split_is_deterministic() {
        let signal = ramp(257, 16);
        let a = split_into_clips(&signal, 2.5).unwrap();
        let b = split_into_clips(&signal, 2.5).unwrap();
        assert_eq!(a.clips, b.clips);
    }
}
