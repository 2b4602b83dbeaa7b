//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

/// Parse and validate a bounded float value.
///
/// # Arguments
///
/// * `s` - The string to parse
/// * `min` - Minimum allowed value (exclusive)
/// * `max` - Maximum allowed value (inclusive)
/// * `name` - Name of the parameter for error messages
pub fn parse_bounded_float(s: &str, min: f64, max: f64, name: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(value > min && value <= max) {
        return Err(format!(
            "{name} must be above {min} and at most {max}, got {value}"
        ));
    }

    Ok(value)
}

/// Parse a clip duration in seconds (up to one day).
pub fn parse_clip_seconds(s: &str) -> Result<f64, String> {
    parse_bounded_float(s, 0.0, 86_400.0, "clip duration")
}

/// Parse a cutoff frequency in Hz (up to 10 MHz).
pub fn parse_frequency(s: &str) -> Result<f64, String> {
    parse_bounded_float(s, 0.0, 10_000_000.0, "frequency")
}
