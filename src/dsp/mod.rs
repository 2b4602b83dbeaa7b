//! Filter design, filtering and spectral estimation.

mod filter;
mod spectrum;

pub use filter::{FilterCoefficients, FilterSpec, apply, apply_zero_phase, design_bandpass};
pub use spectrum::{Periodogram, Spectrogram, periodogram, spectrogram};
