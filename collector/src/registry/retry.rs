//! Bounded retry with exponential backoff for registry requests.

use log::warn;
use std::time::Duration;

use super::download::DownloadError;

/// Retry schedule applied to every registry request.
///
/// The first attempt happens immediately; each retry waits
/// `initial_backoff * 2^(retry - 1)`, capped at `max_backoff`. Only
/// transient failures (see [`DownloadError::is_transient`]) are retried.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use csv_collector::registry::retry::RetryPolicy;
///
/// let policy = RetryPolicy::new(3, Duration::from_millis(500), Duration::from_secs(8));
/// assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
/// assert_eq!(policy.backoff_for(2), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    /// Build a policy; `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Total attempts allowed, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the given retry (1-based).
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Run `request`, retrying transient failures and calling `sleep`
    /// between attempts.
    ///
    /// # Errors
    ///
    /// Returns the last error once attempts are exhausted, or the first
    /// non-transient error.
    pub fn run<T>(
        &self,
        sleep: &dyn Fn(Duration),
        mut request: impl FnMut() -> Result<T, DownloadError>,
    ) -> Result<T, DownloadError> {
        let mut attempt = 1;
        loop {
            match request() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.backoff_for(attempt);
                    warn!(
                        "attempt {attempt}/{} failed: {err}; retrying in {delay:?}",
                        self.max_attempts
                    );
                    sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500), Duration::from_secs(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::{Cell, RefCell};

    fn unavailable() -> DownloadError {
        DownloadError::Status {
            url: "https://registry.test/blob".to_owned(),
            code: 503,
        }
    }

    #[rstest]
    #[case(1, 500)]
    #[case(2, 1000)]
    #[case(3, 2000)]
    #[case(6, 8000)]
    #[case(40, 8000)]
    fn backoff_doubles_until_capped(#[case] retry: u32, #[case] expected_ms: u64) {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(retry), Duration::from_millis(expected_ms));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn retries_transient_failure_then_succeeds() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0);
        let sleeps = RefCell::new(Vec::new());

        let result = policy.run(
            &|delay| sleeps.borrow_mut().push(delay),
            || {
                calls.set(calls.get() + 1);
                if calls.get() == 1 {
                    Err(unavailable())
                } else {
                    Ok("body")
                }
            },
        );

        assert_eq!(result.expect("second attempt succeeds"), "body");
        assert_eq!(calls.get(), 2);
        assert_eq!(sleeps.into_inner(), vec![Duration::from_millis(500)]);
    }

    #[test]
    fn not_found_is_not_retried() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0);

        let result: Result<(), _> = policy.run(&|_| {}, || {
            calls.set(calls.get() + 1);
            Err(DownloadError::NotFound {
                url: "https://registry.test/missing".to_owned(),
            })
        });

        assert!(matches!(result, Err(DownloadError::NotFound { .. })));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn attempts_never_exceed_maximum() {
        let policy = RetryPolicy::new(4, Duration::from_millis(1), Duration::from_millis(1));
        let calls = Cell::new(0);

        let result: Result<(), _> = policy.run(&|_| {}, || {
            calls.set(calls.get() + 1);
            Err(unavailable())
        });

        assert!(matches!(result, Err(DownloadError::Status { code: 503, .. })));
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn none_policy_makes_a_single_attempt() {
        let calls = Cell::new(0);

        let result: Result<(), _> = RetryPolicy::none().run(&|_| {}, || {
            calls.set(calls.get() + 1);
            Err(unavailable())
        });

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
