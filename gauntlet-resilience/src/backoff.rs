//! Exponential backoff between retry attempts

use std::time::Duration;

/// `initial * base^(attempt - 1)`, capped at `max_delay`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    initial_delay: Duration,
    max_delay: Duration,
    base: f64,
}

impl Backoff {
    pub fn new(initial_delay: Duration, max_delay: Duration, base: f64) -> Self {
        Self {
            initial_delay,
            max_delay,
            base,
        }
    }

    /// Wait after failed attempt `attempt` (1-indexed)
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = self
            .base
            .powi(i32::try_from(attempt - 1).unwrap_or(i32::MAX));
        scale(self.initial_delay, factor).min(self.max_delay)
    }
}

/// Multiply without panicking on overflow, NaN or negative factors
fn scale(delay: Duration, factor: f64) -> Duration {
    if !factor.is_finite() || factor < 0.0 {
        return Duration::MAX;
    }
    Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_schedule_doubles_then_caps() {
        let backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(2), 2.0);
        let schedule: Vec<u64> = (1..=7).map(|a| backoff.delay(a).as_millis() as u64).collect();
        assert_eq!(schedule, vec![100, 200, 400, 800, 1600, 2000, 2000]);
        assert_eq!(backoff.delay(10_000), Duration::from_secs(2));
    }

    #[test]
    fn test_base_one_is_constant() {
        let backoff = Backoff::new(Duration::from_millis(5), Duration::from_secs(1), 1.0);
        assert_eq!(backoff.delay(1), Duration::from_millis(5));
        assert_eq!(backoff.delay(50), Duration::from_millis(5));
    }

    #[test]
    fn test_attempt_zero_waits_nothing() {
        let backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(2), 2.0);
        assert_eq!(backoff.delay(0), Duration::ZERO);
    }
}
