use std::time::Duration;

use rand::Rng;

use crate::ClientOptions;

/// Largest exponent applied to the base delay.
const MAX_EXPONENT: usize = 16;

/// Computes the delay before retry number `attempt` (zero-based).
///
/// The result is `base_ms * 2^attempt + jitter_unit * jitter_ms`, truncated to
/// whole milliseconds and always strictly below `base_ms * 2^attempt +
/// jitter_ms` when `jitter_ms > 0`. `jitter_unit` is expected in `[0, 1)`;
/// anything else (including NaN) is clamped into that range.
pub fn backoff_delay(base_ms: u64, jitter_ms: u64, attempt: usize, jitter_unit: f64) -> Duration {
    let exp = attempt.min(MAX_EXPONENT) as u32;
    let exponential_ms = base_ms.saturating_mul(1u64 << exp);

    let unit = if jitter_unit.is_nan() {
        0.0
    } else {
        jitter_unit.clamp(0.0, 1.0)
    };
    let jitter = ((jitter_ms as f64) * unit) as u64;
    let jitter = jitter.min(jitter_ms.saturating_sub(1));

    Duration::from_millis(exponential_ms.saturating_add(jitter))
}

/// Delay for `attempt` using the configured policy and a fresh random jitter.
pub(crate) fn next_delay(options: &ClientOptions, attempt: usize) -> Duration {
    let unit = rand::thread_rng().gen::<f64>();
    backoff_delay(
        options.retry_backoff_ms,
        options.retry_jitter_ms,
        attempt,
        unit,
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{backoff_delay, next_delay};
    use crate::ClientOptions;

    #[test]
    fn default_policy_stays_within_one_second_window() {
        for attempt in 0..8 {
            let floor = Duration::from_secs(1u64 << attempt);
            let ceiling = floor + Duration::from_secs(1);
            for unit in [0.0, 0.25, 0.5, 0.999, 0.999_999_999_999] {
                let delay = backoff_delay(1_000, 1_000, attempt, unit);
                assert!(delay >= floor, "attempt {attempt} unit {unit}: {delay:?}");
                assert!(delay < ceiling, "attempt {attempt} unit {unit}: {delay:?}");
            }
        }
    }

    #[test]
    fn zero_jitter_unit_gives_pure_exponential() {
        assert_eq!(backoff_delay(1_000, 1_000, 0, 0.0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1_000, 1_000, 1, 0.0), Duration::from_secs(2));
        assert_eq!(backoff_delay(1_000, 1_000, 2, 0.0), Duration::from_secs(4));
    }

    #[test]
    fn jitter_unit_scales_linearly() {
        assert_eq!(
            backoff_delay(1_000, 1_000, 0, 0.5),
            Duration::from_millis(1_500)
        );
    }

    #[test]
    fn out_of_range_units_are_clamped() {
        assert_eq!(backoff_delay(100, 100, 0, -3.0), Duration::from_millis(100));
        assert_eq!(backoff_delay(100, 100, 0, f64::NAN), Duration::from_millis(100));
        assert_eq!(backoff_delay(100, 100, 0, 7.0), Duration::from_millis(199));
    }

    #[test]
    fn zero_jitter_range_adds_nothing() {
        assert_eq!(backoff_delay(10, 0, 3, 0.9), Duration::from_millis(80));
    }

    #[test]
    fn large_attempts_saturate_instead_of_overflowing() {
        let capped = backoff_delay(1_000, 0, 16, 0.0);
        assert_eq!(backoff_delay(1_000, 0, 10_000, 0.0), capped);
        assert_eq!(
            backoff_delay(u64::MAX, 1_000, 4, 0.5),
            Duration::from_millis(u64::MAX)
        );
    }

    #[test]
    fn random_delay_respects_configured_bounds() {
        let options = ClientOptions::default();
        for attempt in 0..4 {
            let delay = next_delay(&options, attempt);
            let floor = Duration::from_secs(1u64 << attempt);
            assert!(delay >= floor && delay < floor + Duration::from_secs(1));
        }
    }
}
