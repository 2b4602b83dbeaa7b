//! Butterworth band-pass design and IIR filtering.
//!
//! Design goes through zeros, poles and gain: the analog Butterworth
//! prototype is shifted to a band-pass around the pre-warped band edges and
//! mapped to the z-plane with the bilinear transform. The result is expanded
//! into transfer-function coefficients `b` (feedforward) and `a` (feedback),
//! each of length `2 * order + 1`.

use crate::audio::Signal;
use crate::error::DspError;
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Band-pass filter request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    /// Lower band edge in Hz.
    pub low_cutoff_hz: f64,
    /// Upper band edge in Hz.
    pub high_cutoff_hz: f64,
    /// Sample rate of the signal to be filtered.
    pub sample_rate_hz: u32,
    /// Butterworth order of the low-pass prototype.
    pub order: usize,
}

impl FilterSpec {
    fn invalid(&self, reason: &'static str) -> DspError {
        DspError::InvalidSpec {
            low_cutoff_hz: self.low_cutoff_hz,
            high_cutoff_hz: self.high_cutoff_hz,
            sample_rate_hz: self.sample_rate_hz,
            order: self.order,
            reason,
        }
    }

    /// Band edges as fractions of the Nyquist frequency.
    fn normalized_edges(&self) -> Result<(f64, f64), DspError> {
        if self.order < 1 {
            return Err(self.invalid("order must be at least 1"));
        }

        let nyquist = f64::from(self.sample_rate_hz) / 2.0;
        let low = self.low_cutoff_hz / nyquist;
        let high = self.high_cutoff_hz / nyquist;

        let in_band = |w: f64| w > 0.0 && w < 1.0;
        if !in_band(low) {
            return Err(self.invalid("low cutoff must lie between 0 Hz and Nyquist"));
        }
        if !in_band(high) {
            return Err(self.invalid("high cutoff must lie between 0 Hz and Nyquist"));
        }
        if low >= high {
            return Err(self.invalid("low cutoff must be below high cutoff"));
        }

        Ok((low, high))
    }
}

/// Transfer-function coefficients of a designed filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    b: Vec<f64>,
    a: Vec<f64>,
    poles: Vec<Complex<f64>>,
}

impl FilterCoefficients {
    /// Feedforward (numerator) coefficients.
    #[must_use]
    pub fn feedforward(&self) -> &[f64] {
        &self.b
    }

    /// Feedback (denominator) coefficients, `a[0] == 1`.
    #[must_use]
    pub fn feedback(&self) -> &[f64] {
        &self.a
    }

    /// Largest pole magnitude; below 1.0 means the filter is stable.
    #[must_use]
    pub fn max_pole_radius(&self) -> f64 {
        self.poles.iter().map(|p| p.norm()).fold(0.0, f64::max)
    }

    /// Complex frequency response at `freq_hz` for a signal at `sample_rate` Hz.
    #[must_use]
    pub fn response_at(&self, freq_hz: f64, sample_rate: u32) -> Complex<f64> {
        let omega = 2.0 * PI * freq_hz / f64::from(sample_rate);
        let z_inv = Complex::from_polar(1.0, -omega);
        let eval = |coeffs: &[f64]| {
            coeffs
                .iter()
                .rev()
                .fold(Complex::new(0.0, 0.0), |acc, &c| acc * z_inv + c)
        };
        eval(&self.b) / eval(&self.a)
    }
}

/// Design a digital Butterworth band-pass filter.
///
/// # Errors
///
/// Returns [`DspError::InvalidSpec`] if the order is zero, either cutoff is
/// not strictly between 0 Hz and Nyquist, or the cutoffs are inverted.
#[allow(clippy::cast_precision_loss)]
pub fn design_bandpass(spec: &FilterSpec) -> Result<FilterCoefficients, DspError> {
    let (low, high) = spec.normalized_edges()?;
    let n = spec.order;
    let degree = i32::try_from(n).map_err(|_| spec.invalid("order is too large"))?;

    // Bilinear transform runs at fs = 2, so band edges pre-warp as 4*tan(pi*w/2)
    let fs2: f64 = 4.0;
    let w1 = fs2 * (PI * low / 2.0).tan();
    let w2 = fs2 * (PI * high / 2.0).tan();
    let bandwidth = w2 - w1;
    let center_sq = w1 * w2;

    // Analog low-pass prototype poles on the left half of the unit circle
    let prototype = (0..n).map(|k| {
        let m = 2.0 * k as f64 - n as f64 + 1.0;
        -Complex::from_polar(1.0, PI * m / (2.0 * n as f64))
    });

    // Low-pass to band-pass: each prototype pole splits into a pair, and
    // `n` zeros land at the origin
    let mut analog_poles = Vec::with_capacity(2 * n);
    for p in prototype {
        let shifted = p * (bandwidth / 2.0);
        let disc = (shifted * shifted - center_sq).sqrt();
        analog_poles.push(shifted + disc);
        analog_poles.push(shifted - disc);
    }
    let analog_gain = bandwidth.powi(degree);

    // Bilinear transform: s = 0 zeros map to z = 1, the zeros at infinity to z = -1
    let poles: Vec<Complex<f64>> = analog_poles
        .iter()
        .map(|&p| (fs2 + p) / (fs2 - p))
        .collect();
    let zeros: Vec<Complex<f64>> = std::iter::repeat_n(Complex::new(1.0, 0.0), n)
        .chain(std::iter::repeat_n(Complex::new(-1.0, 0.0), n))
        .collect();

    let pole_factor = analog_poles
        .iter()
        .fold(Complex::new(1.0, 0.0), |acc, &p| acc * (fs2 - p));
    let gain = analog_gain * (fs2.powi(degree) / pole_factor).re;

    let b = poly(&zeros).into_iter().map(|c| c.re * gain).collect();
    let a = poly(&poles).into_iter().map(|c| c.re).collect();

    Ok(FilterCoefficients { b, a, poles })
}

/// Monic polynomial coefficients (highest power first) with the given roots.
fn poly(roots: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for &root in roots {
        coeffs.push(Complex::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= root * prev;
        }
    }
    coeffs
}

/// Filter a signal with a single causal pass.
///
/// Output length equals input length. The filter's group delay is not
/// compensated; see [`apply_zero_phase`] for a forward-backward pass.
///
/// # Errors
///
/// Returns [`DspError::EmptySignal`] if the signal has no samples.
pub fn apply(signal: &Signal, coeffs: &FilterCoefficients) -> Result<Signal, DspError> {
    if signal.is_empty() {
        return Err(DspError::EmptySignal);
    }
    let filtered = lfilter(&coeffs.b, &coeffs.a, signal.samples());
    Signal::new(filtered, signal.sample_rate())
}

/// Filter forward, then backward over the reversed output.
///
/// Phase shifts cancel and the magnitude response is squared.
///
/// # Errors
///
/// Returns [`DspError::EmptySignal`] if the signal has no samples.
pub fn apply_zero_phase(
    signal: &Signal,
    coeffs: &FilterCoefficients,
) -> Result<Signal, DspError> {
    if signal.is_empty() {
        return Err(DspError::EmptySignal);
    }
    let mut pass = lfilter(&coeffs.b, &coeffs.a, signal.samples());
    pass.reverse();
    let mut pass = lfilter(&coeffs.b, &coeffs.a, &pass);
    pass.reverse();
    Signal::new(pass, signal.sample_rate())
}

/// Direct form II transposed IIR filter with zero initial state.
fn lfilter(b: &[f64], a: &[f64], x: &[f64]) -> Vec<f64> {
    let len = b.len().max(a.len());
    let a0 = a[0];
    let coeff = |c: &[f64], i: usize| c.get(i).copied().unwrap_or(0.0) / a0;
    let b: Vec<f64> = (0..len).map(|i| coeff(b, i)).collect();
    let a: Vec<f64> = (0..len).map(|i| coeff(a, i)).collect();

    let mut state = vec![0.0; len - 1];
    let mut output = Vec::with_capacity(x.len());

    for &xn in x {
        let yn = b[0] * xn + state.first().copied().unwrap_or(0.0);
        for i in 0..state.len() {
            let next = state.get(i + 1).copied().unwrap_or(0.0);
            state[i] = b[i + 1] * xn - a[i + 1] * yn + next;
        }
        output.push(yn);
    }

    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]
mod tests {
    use super::*;

    fn spec(low: f64, high: f64, rate: u32, order: usize) -> FilterSpec {
        FilterSpec {
            low_cutoff_hz: low,
            high_cutoff_hz: high,
            sample_rate_hz: rate,
            order,
        }
    }

    fn impulse(len: usize, rate: u32) -> Signal {
        let mut samples = vec![0.0; len];
        samples[0] = 1.0;
        Signal::new(samples, rate).unwrap()
    }

    #[test]
    fn test_design_coefficient_count() {
        for order in 1..=6 {
            let coeffs = design_bandpass(&spec(5_000.0, 191_000.0, 384_000, order)).unwrap();
            assert_eq!(coeffs.feedforward().len(), 2 * order + 1);
            assert_eq!(coeffs.feedback().len(), 2 * order + 1);
            assert!((coeffs.feedback()[0] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_design_is_stable_for_valid_specs() {
        let cases = [
            spec(5_000.0, 191_000.0, 384_000, 5),
            spec(20_000.0, 80_000.0, 250_000, 4),
            spec(300.0, 3_400.0, 8_000, 2),
            spec(1_000.0, 2_000.0, 44_100, 1),
            spec(15_000.0, 120_000.0, 256_000, 3),
        ];
        for case in cases {
            let coeffs = design_bandpass(&case).unwrap();
            assert!(coeffs.max_pole_radius() < 1.0, "{case:?}");

            let response = apply(&impulse(20_000, case.sample_rate_hz), &coeffs).unwrap();
            assert!(response.samples().iter().all(|v| v.is_finite()));
            let tail: f64 = response.samples()[19_000..].iter().map(|v| v * v).sum();
            assert!(tail < 1e-12, "{case:?} tail energy {tail}");
        }
    }

    #[test]
    fn test_design_unity_gain_at_band_center() {
        let case = spec(5_000.0, 191_000.0, 384_000, 5);
        let coeffs = design_bandpass(&case).unwrap();
        // Geometric centre of the pre-warped edges, mapped back to Hz
        let rate = f64::from(case.sample_rate_hz);
        let warp = |f: f64| (PI * f / rate).tan();
        let center = (warp(case.low_cutoff_hz) * warp(case.high_cutoff_hz)).sqrt();
        let center_hz = center.atan() * rate / PI;
        let gain = coeffs.response_at(center_hz, case.sample_rate_hz).norm();
        assert!((gain - 1.0).abs() < 1e-6, "gain {gain}");
    }

    #[test]
    fn test_design_half_power_at_edges() {
        let case = spec(1_000.0, 4_000.0, 16_000, 3);
        let coeffs = design_bandpass(&case).unwrap();
        for edge in [case.low_cutoff_hz, case.high_cutoff_hz] {
            let gain = coeffs.response_at(edge, case.sample_rate_hz).norm();
            assert!((gain - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6, "gain {gain}");
        }
    }

    #[test]
    fn test_design_blocks_dc_and_nyquist() {
        let coeffs = design_bandpass(&spec(5_000.0, 191_000.0, 384_000, 5)).unwrap();
        let b = coeffs.feedforward();
        let scale: f64 = b.iter().map(|c| c.abs()).sum();
        // Numerator vanishes at z = 1 and z = -1
        let at_dc: f64 = b.iter().sum();
        let at_nyquist: f64 = b
            .iter()
            .enumerate()
            .map(|(i, c)| if i % 2 == 0 { *c } else { -c })
            .sum();
        assert!(at_dc.abs() < 1e-12 * scale);
        assert!(at_nyquist.abs() < 1e-12 * scale);
    }

    #[test]
    fn test_design_rejects_inverted_bounds() {
        let err = design_bandpass(&spec(200_000.0, 190_000.0, 384_000, 5)).unwrap_err();
        assert!(matches!(err, DspError::InvalidSpec { .. }));

        let err = design_bandpass(&spec(90_000.0, 50_000.0, 384_000, 5)).unwrap_err();
        assert!(matches!(
            err,
            DspError::InvalidSpec {
                reason: "low cutoff must be below high cutoff",
                ..
            }
        ));
    }

    #[test]
    fn test_design_rejects_cutoff_above_nyquist() {
        // 191 kHz is fine at 384 kHz but not at 250 kHz
        let err = design_bandpass(&spec(5_000.0, 191_000.0, 250_000, 5)).unwrap_err();
        assert!(matches!(err, DspError::InvalidSpec { .. }));
    }

    #[test]
    fn test_design_rejects_zero_order_and_zero_cutoff() {
        assert!(design_bandpass(&spec(5_000.0, 20_000.0, 96_000, 0)).is_err());
        assert!(design_bandpass(&spec(0.0, 20_000.0, 96_000, 2)).is_err());
        assert!(design_bandpass(&spec(f64::NAN, 20_000.0, 96_000, 2)).is_err());
        assert!(design_bandpass(&spec(5_000.0, 20_000.0, 0, 2)).is_err());
    }

    #[test]
    fn test_apply_zero_signal_stays_zero() {
        let coeffs = design_bandpass(&spec(5_000.0, 191_000.0, 384_000, 5)).unwrap();
        let signal = Signal::new(vec![0.0; 1_000], 384_000).unwrap();
        let filtered = apply(&signal, &coeffs).unwrap();
        assert_eq!(filtered.len(), 1_000);
        assert!(filtered.samples().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_apply_empty_signal() {
        let coeffs = design_bandpass(&spec(5_000.0, 191_000.0, 384_000, 5)).unwrap();
        let signal = Signal::new(Vec::new(), 384_000).unwrap();
        assert_eq!(apply(&signal, &coeffs), Err(DspError::EmptySignal));
        assert_eq!(apply_zero_phase(&signal, &coeffs), Err(DspError::EmptySignal));
    }

    #[test]
    fn test_apply_is_causal() {
        let coeffs = design_bandpass(&spec(1_000.0, 4_000.0, 16_000, 2)).unwrap();
        let mut samples = vec![0.0; 64];
        samples[10] = 1.0;
        let signal = Signal::new(samples, 16_000).unwrap();
        let filtered = apply(&signal, &coeffs).unwrap();
        assert!(filtered.samples()[..10].iter().all(|&v| v == 0.0));
        assert!(filtered.samples()[10] != 0.0);
    }

    #[test]
    fn test_zero_phase_response_is_symmetric() {
        let coeffs = design_bandpass(&spec(1_000.0, 4_000.0, 16_000, 2)).unwrap();
        let mut samples = vec![0.0; 2_001];
        samples[1_000] = 1.0;
        let signal = Signal::new(samples, 16_000).unwrap();
        let filtered = apply_zero_phase(&signal, &coeffs).unwrap();
        let y = filtered.samples();
        for k in 1..200 {
            assert!((y[1_000 - k] - y[1_000 + k]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_lfilter_first_order_recursion() {
        // y[n] = x[n] + 0.5 y[n-1]
        let y = lfilter(&[1.0], &[1.0, -0.5], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(y, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_lfilter_normalizes_leading_feedback() {
        let y = lfilter(&[2.0, 2.0], &[2.0], &[1.0, 1.0, 0.0]);
        assert_eq!(y, vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_poly_expands_roots() {
        let coeffs = poly(&[Complex::new(1.0, 0.0), Complex::new(-1.0, 0.0)]);
        let re: Vec<f64> = coeffs.iter().map(|c| c.re).collect();
        assert_eq!(re, vec![1.0, 0.0, -1.0]);
    }
}
