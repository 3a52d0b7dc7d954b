//! Bounded exponential backoff around a whole extraction step.
//!
//! No component retries internally; this wrapper is for callers that
//! invoke an extraction synchronously as a fallback. The wrapped
//! operation must be side-effect idempotent for retries to be safe.

use std::time::Duration;

use tracing::warn;

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay; doubles after each failed attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Run `operation` up to `max_attempts` times, sleeping `base_delay`,
/// `2 * base_delay`, ... between attempts. Returns the first success or
/// the last error.
pub fn with_retry<T, E, F>(mut operation: F, max_attempts: u32, base_delay: Duration) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: std::fmt::Display,
{
    let attempts = max_attempts.max(1);
    let mut delay = base_delay;
    let mut attempt = 1;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(error) if attempt < attempts => {
                warn!(attempt, max_attempts = attempts, %error, "attempt failed, backing off");
                std::thread::sleep(delay);
                delay *= 2;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_success() {
        let mut calls = 0;
        let result: Result<i32, String> = with_retry(
            || {
                calls += 1;
                Ok(7)
            },
            3,
            Duration::ZERO,
        );
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_until_success() {
        let mut calls = 0;
        let result: Result<i32, String> = with_retry(
            || {
                calls += 1;
                if calls < 3 {
                    Err("not yet".to_string())
                } else {
                    Ok(calls)
                }
            },
            3,
            Duration::ZERO,
        );
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), String> = with_retry(
            || {
                calls += 1;
                Err(format!("failure {calls}"))
            },
            3,
            Duration::ZERO,
        );
        assert_eq!(result.unwrap_err(), "failure 3");
        assert_eq!(calls, 3);
    }
}
