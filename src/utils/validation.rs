//! Centralized validation and numeric helpers.

use crate::core::reference::ReferenceLengths;

/// Largest accepted MAPQ filter
pub const MAX_MAPQ_FILTER: u8 = 60;

/// Configuration validation error types
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("MAPQ threshold must be between 0 and {MAX_MAPQ_FILTER} (got {0})")]
    MapqOutOfRange(u8),
    #[error("Window size must be a positive integer")]
    ZeroWindowSize,
    #[error("Window size must not exceed {max} (half the longest reference), got {window_size}")]
    WindowTooLarge { window_size: u64, max: u64 },
    #[error("Short read threshold ({short}) must not exceed long read threshold ({long})")]
    InvertedLengthThresholds { short: u64, long: u64 },
}

/// Check a MAPQ filter value
///
/// # Errors
///
/// Returns `ConfigError::MapqOutOfRange` above [`MAX_MAPQ_FILTER`].
pub fn validate_min_mapq(min_mapq: Option<u8>) -> Result<(), ConfigError> {
    match min_mapq {
        Some(q) if q > MAX_MAPQ_FILTER => Err(ConfigError::MapqOutOfRange(q)),
        _ => Ok(()),
    }
}

/// Check a window size against the declared references.
///
/// With no declared references only positivity is checked.
///
/// # Errors
///
/// Returns `ConfigError::ZeroWindowSize` for 0, or
/// `ConfigError::WindowTooLarge` when the window is more than half of the
/// longest reference.
pub fn validate_window_size(window_size: u64, lengths: &ReferenceLengths) -> Result<(), ConfigError> {
    if window_size == 0 {
        return Err(ConfigError::ZeroWindowSize);
    }

    if let Some(longest) = lengths.longest() {
        // window_size <= longest / 2, kept exact for odd lengths
        if window_size.saturating_mul(2) > longest {
            return Err(ConfigError::WindowTooLarge {
                window_size,
                max: longest / 2,
            });
        }
    }

    Ok(())
}

/// Check that the short-read threshold does not exceed the long-read one
///
/// # Errors
///
/// Returns `ConfigError::InvertedLengthThresholds` when `short > long`.
pub fn validate_length_thresholds(short: u64, long: u64) -> Result<(), ConfigError> {
    if short > long {
        return Err(ConfigError::InvertedLengthThresholds { short, long });
    }
    Ok(())
}

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `part / whole`, or 0.0 when `whole` is zero
#[must_use]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    count_to_f64(part) / count_to_f64(whole)
}
