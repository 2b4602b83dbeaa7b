//! Configuration validation.
//!
//! Only checks that do not depend on a recording live here. Whether the
//! cutoffs fit below a recording's Nyquist frequency is decided by the filter
//! designer once the sample rate is known.

use crate::config::{Config, OutputConfig, PipelineConfig};
use crate::constants::spectrum::MIN_NFFT;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_pipeline(&config.pipeline)?;
    validate_output(&config.output)?;
    Ok(())
}

fn invalid(message: String) -> Error {
    Error::ConfigValidation { message }
}

/// Validate pipeline settings.
pub fn validate_pipeline(cfg: &PipelineConfig) -> Result<()> {
    if !cfg.clip_seconds.is_finite() || cfg.clip_seconds <= 0.0 {
        return Err(invalid(format!(
            "clip_seconds must be positive, got {}",
            cfg.clip_seconds
        )));
    }

    if !cfg.low_cutoff_hz.is_finite() || cfg.low_cutoff_hz <= 0.0 {
        return Err(invalid(format!(
            "low_cutoff_hz must be positive, got {}",
            cfg.low_cutoff_hz
        )));
    }

    if !cfg.high_cutoff_hz.is_finite() || cfg.high_cutoff_hz <= cfg.low_cutoff_hz {
        return Err(invalid(format!(
            "high_cutoff_hz must be above low_cutoff_hz ({}), got {}",
            cfg.low_cutoff_hz, cfg.high_cutoff_hz
        )));
    }

    if cfg.filter_order == 0 {
        return Err(invalid("filter_order must be at least 1".to_string()));
    }

    if cfg.target_rate == 0 {
        return Err(invalid("target_rate must be at least 1 Hz".to_string()));
    }

    Ok(())
}

/// Validate output settings.
fn validate_output(cfg: &OutputConfig) -> Result<()> {
    if cfg.formats.is_empty() {
        return Err(invalid("at least one output format is required".to_string()));
    }

    if cfg.nfft < MIN_NFFT {
        return Err(invalid(format!(
            "nfft must be at least {MIN_NFFT}, got {}",
            cfg.nfft
        )));
    }

    Ok(())
}
