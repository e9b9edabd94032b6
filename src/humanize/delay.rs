//! Randomized inter-click delays
//!
//! Turns a target click rate and a jitter percentage into the delay the
//! click loop waits after each click. Jitter spreads each delay uniformly
//! around the base delay so consecutive clicks are not evenly spaced.

use std::time::Duration;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::config::EngineSettings;

/// Absolute floor for any delay, in seconds
pub const MIN_DELAY: f64 = 0.001;

/// Rate used in place of a non-positive target rate
pub const RATE_FLOOR: f64 = 0.1;

/// Longest delay [`Humanizer::next_delay`] returns
pub const MAX_DELAY: Duration = Duration::from_secs(20);

/// Compute one delay in seconds
///
/// A non-positive (or NaN) `target_rate` is replaced by [`RATE_FLOOR`] and
/// `jitter_pct` is clamped to `0..=100`, so this never fails. With zero
/// jitter the result is exactly `1 / target_rate`; otherwise it is drawn
/// uniformly from `base ± base * jitter_pct / 100`. Either way the result
/// is at least `min_delay`.
pub fn compute_delay<R: Rng>(
    rng: &mut R,
    target_rate: f64,
    jitter_pct: f64,
    min_delay: f64,
) -> f64 {
    let rate = if target_rate > 0.0 {
        target_rate.max(f64::MIN_POSITIVE)
    } else {
        RATE_FLOOR
    };
    let base = 1.0 / rate;

    let jitter = if jitter_pct.is_finite() {
        jitter_pct.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let delay = if jitter == 0.0 {
        base
    } else {
        let variation = base * (jitter / 100.0);
        rng.random_range((base - variation)..=(base + variation))
    };

    delay.max(min_delay)
}

/// Delay generator owned by the click loop
pub struct Humanizer<R = ThreadRng> {
    rng: R,
    min_delay: f64,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Humanizer {
    /// Create a humanizer backed by the thread-local generator
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl<R: Rng> Humanizer<R> {
    /// Create a humanizer with a specific random source
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            min_delay: MIN_DELAY,
        }
    }

    /// Override the delay floor
    pub fn with_min_delay(mut self, min_delay: f64) -> Self {
        self.min_delay = min_delay.max(0.0);
        self
    }

    /// Delay in seconds for the given settings
    pub fn next_delay_secs(&mut self, settings: &EngineSettings) -> f64 {
        compute_delay(
            &mut self.rng,
            settings.target_rate,
            settings.jitter_pct,
            self.min_delay,
        )
    }

    /// Delay to wait after a click
    pub fn next_delay(&mut self, settings: &EngineSettings) -> Duration {
        let secs = self.next_delay_secs(settings);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(MAX_DELAY)
            .min(MAX_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let mut rng = seeded();

        for rate in [1.0, 2.5, 10.0, 200.0] {
            for _ in 0..10 {
                let delay = compute_delay(&mut rng, rate, 0.0, MIN_DELAY);
                assert_eq!(delay, 1.0 / rate);
            }
        }
    }

    #[test]
    fn test_zero_jitter_respects_floor() {
        let mut rng = seeded();
        let delay = compute_delay(&mut rng, 5000.0, 0.0, MIN_DELAY);
        assert_eq!(delay, MIN_DELAY);
    }

    #[test]
    fn test_jittered_delays_within_bounds() {
        let mut rng = seeded();

        for (rate, jitter) in [(10.0, 20.0), (1.0, 100.0), (200.0, 50.0), (37.0, 0.5)] {
            let base: f64 = 1.0 / rate;
            let variation = base * (jitter / 100.0);
            let lower = MIN_DELAY.max(base - variation);
            let upper = base + variation;

            for _ in 0..1000 {
                let delay = compute_delay(&mut rng, rate, jitter, MIN_DELAY);
                assert!(
                    delay >= lower && delay <= upper,
                    "delay {} outside [{}, {}] for rate {} jitter {}",
                    delay,
                    lower,
                    upper,
                    rate,
                    jitter
                );
            }
        }
    }

    #[test]
    fn test_jittered_mean_converges_to_base() {
        let mut rng = seeded();
        let base = 1.0 / 10.0;
        let samples = 20_000;

        let total: f64 = (0..samples)
            .map(|_| compute_delay(&mut rng, 10.0, 40.0, MIN_DELAY))
            .sum();
        let mean = total / samples as f64;

        assert!(
            (mean - base).abs() < base * 0.01,
            "mean {} too far from {}",
            mean,
            base
        );
    }

    #[test]
    fn test_jitter_produces_variance() {
        let mut rng = seeded();
        let base = 0.1;

        let delays: Vec<f64> = (0..500)
            .map(|_| compute_delay(&mut rng, 10.0, 30.0, MIN_DELAY))
            .collect();

        assert!(delays.iter().any(|&d| d < base));
        assert!(delays.iter().any(|&d| d > base));
    }

    #[test]
    fn test_non_positive_rate_does_not_fail() {
        let mut rng = seeded();

        for rate in [0.0, -1.0, -250.0, f64::NAN, f64::NEG_INFINITY] {
            for jitter in [0.0, 20.0, 100.0] {
                let delay = compute_delay(&mut rng, rate, jitter, MIN_DELAY);
                assert!(delay >= MIN_DELAY);
                assert!(delay <= 2.0 / RATE_FLOOR);
            }
        }

        assert_eq!(compute_delay(&mut rng, 0.0, 0.0, MIN_DELAY), 1.0 / RATE_FLOOR);
    }

    #[test]
    fn test_extreme_inputs_stay_finite() {
        let mut rng = seeded();

        assert_eq!(compute_delay(&mut rng, f64::INFINITY, 50.0, MIN_DELAY), MIN_DELAY);
        assert!(compute_delay(&mut rng, 1e-320, 100.0, MIN_DELAY).is_finite());
        assert_eq!(compute_delay(&mut rng, 4.0, f64::NAN, MIN_DELAY), 0.25);
        assert!(compute_delay(&mut rng, 4.0, 400.0, MIN_DELAY) <= 0.5);
    }

    #[test]
    fn test_humanizer_uses_settings() {
        let mut humanizer = Humanizer::with_rng(seeded());
        let settings = EngineSettings {
            target_rate: 4.0,
            jitter_pct: 0.0,
            ..Default::default()
        };

        assert_eq!(humanizer.next_delay(&settings), Duration::from_millis(250));
    }

    #[test]
    fn test_humanizer_custom_floor() {
        let mut humanizer = Humanizer::with_rng(seeded()).with_min_delay(0.5);
        let settings = EngineSettings {
            target_rate: 100.0,
            jitter_pct: 10.0,
            ..Default::default()
        };

        for _ in 0..50 {
            assert!(humanizer.next_delay_secs(&settings) >= 0.5);
        }
    }

    #[test]
    fn test_huge_delay_converts_without_panic() {
        let mut humanizer = Humanizer::with_rng(seeded());
        let settings = EngineSettings {
            target_rate: 1e-320,
            jitter_pct: 0.0,
            ..Default::default()
        };

        assert_eq!(humanizer.next_delay(&settings), MAX_DELAY);
    }
}
