use std::time::Duration;

/// Base delay before the first resubmission of unprocessed items.
pub const BACKOFF_BASE_MS: u64 = 50;
/// Cap for any single backoff delay.
pub const BACKOFF_MAX_MS: u64 = 5_000;

/// Delay before resubmission `attempt` (1-based): doubles from
/// [`BACKOFF_BASE_MS`] up to [`BACKOFF_MAX_MS`].
#[must_use]
pub fn compute_backoff(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    let delay_ms = BACKOFF_BASE_MS.saturating_mul(factor);
    Duration::from_millis(delay_ms.min(BACKOFF_MAX_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(compute_backoff(1), Duration::from_millis(50));
        assert_eq!(compute_backoff(2), Duration::from_millis(100));
        assert_eq!(compute_backoff(4), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_capped() {
        assert_eq!(compute_backoff(8), Duration::from_millis(5_000));
        assert_eq!(compute_backoff(200), Duration::from_millis(5_000));
    }

    #[test]
    fn test_backoff_attempt_zero_is_base() {
        assert_eq!(compute_backoff(0), Duration::from_millis(50));
    }
}
