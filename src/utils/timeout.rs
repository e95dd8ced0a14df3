//! Timeout validation for configured waits

use std::time::Duration;

use super::errors::ConfigError;

/// Upper bound for any per-action wait (network idle, settle delay)
pub const MAX_SETTLE_TIMEOUT_MS: u64 = 60_000;

/// Upper bound for the per-character typing delay
pub const MAX_TYPING_DELAY_MS: u64 = 1_000;

/// Upper bound for a single model request
pub const MAX_REQUEST_TIMEOUT_MS: u64 = 600_000;

/// Validate a millisecond wait against `max_ms`
///
/// # Example
/// ```
/// use browser_computer_use::utils::validate_wait;
/// let wait = validate_wait("settle_delay_ms", 800, 60_000).unwrap();
/// assert_eq!(wait.as_millis(), 800);
/// ```
pub fn validate_wait(field: &'static str, ms: u64, max_ms: u64) -> Result<Duration, ConfigError> {
    if ms > max_ms {
        return Err(ConfigError::TimeoutTooLong {
            field,
            value: ms,
            max: max_ms,
        });
    }
    Ok(Duration::from_millis(ms))
}
