use std::convert::Infallible;
use std::ops::Range;

use jiff::Timestamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use super::SampleProvider;
use super::config::{DEFAULT_ACCURACY_RANGE, DEFAULT_STEP_DEGREES, SourceConfig};
use crate::sample::CoordinateSample;

/// A random walk around a reference coordinate.
///
/// Every sample nudges latitude and longitude by an independent uniform delta in
/// `[-step, +step]`, so consecutive samples look like slow continuous movement.
#[derive(Debug)]
pub struct SimulatedProvider {
    latitude: f64,
    longitude: f64,
    step_degrees: f64,
    accuracy_range: Range<f64>,
    rng: StdRng,
}

impl SimulatedProvider {
    pub fn new(config: &SourceConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            latitude: config.origin.0,
            longitude: config.origin.1,
            step_degrees: checked_step(config.step_degrees),
            accuracy_range: checked_accuracy_range(&config.accuracy_range),
            rng,
        }
    }

    /// Current reference coordinate as `(latitude, longitude)`.
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn step(&mut self) -> CoordinateSample {
        let step = self.step_degrees;
        self.latitude += self.rng.random_range(-step..=step);
        self.longitude += self.rng.random_range(-step..=step);

        // `random_range` panics on an empty range; a degenerate one is a fixed accuracy.
        let accuracy = if self.accuracy_range.is_empty() {
            self.accuracy_range.start
        } else {
            self.rng.random_range(self.accuracy_range.clone())
        };

        CoordinateSample::new(self.latitude, self.longitude, Timestamp::now(), Some(accuracy))
    }
}

fn checked_step(step_degrees: f64) -> f64 {
    if step_degrees.is_finite() {
        // A full turn of longitude is already more than any walk needs.
        step_degrees.abs().min(180.0)
    } else {
        warn!(step_degrees, "Invalid simulation step, using default");
        DEFAULT_STEP_DEGREES
    }
}

/// Keep ranges that are finite and ordered, a single point (`start == end`) included.
fn checked_accuracy_range(range: &Range<f64>) -> Range<f64> {
    if (range.end - range.start).is_finite() && range.start <= range.end {
        range.clone()
    } else {
        warn!(
            start = range.start,
            end = range.end,
            "Invalid simulated accuracy range, using default"
        );
        DEFAULT_ACCURACY_RANGE
    }
}

impl SampleProvider for SimulatedProvider {
    type Error = Infallible;

    async fn next_sample(&mut self) -> Result<CoordinateSample, Self::Error> {
        Ok(self.step())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn seeded(seed: u64) -> SimulatedProvider {
        SimulatedProvider::new(&SourceConfig::builder().rng_seed(seed).build())
    }

    #[test]
    fn test_walk_stays_within_step() {
        let mut provider = seeded(7);
        let (mut lat, mut lon) = provider.position();

        for _ in 0..200 {
            let sample = provider.step();
            assert!((sample.latitude - lat).abs() <= 0.00005);
            assert!((sample.longitude - lon).abs() <= 0.00005);
            lat = sample.latitude;
            lon = sample.longitude;
        }
    }

    #[test]
    fn test_accuracy_in_range() {
        let mut provider = seeded(11);

        for _ in 0..200 {
            let accuracy = provider.step().accuracy_meters.unwrap();
            assert!((5.0..15.0).contains(&accuracy));
        }
    }

    #[test]
    fn test_walk_starts_at_origin() {
        let provider = SimulatedProvider::new(
            &SourceConfig::builder()
                .origin((48.8566, 2.3522))
                .rng_seed(1)
                .build(),
        );
        assert_eq!(provider.position(), (48.8566, 2.3522));
    }

    #[test]
    fn test_single_point_accuracy_range() {
        let mut provider = SimulatedProvider::new(
            &SourceConfig::builder()
                .accuracy_range(10.0..10.0)
                .rng_seed(3)
                .build(),
        );

        for _ in 0..5 {
            assert_eq!(provider.step().accuracy_meters, Some(10.0));
        }
    }

    #[rstest]
    #[case(15.0..5.0)]
    #[case(f64::NAN..10.0)]
    #[case(5.0..f64::INFINITY)]
    #[case(-f64::MAX..f64::MAX)]
    fn test_invalid_accuracy_range_uses_default(#[case] range: Range<f64>) {
        let mut provider = SimulatedProvider::new(
            &SourceConfig::builder()
                .accuracy_range(range)
                .rng_seed(5)
                .build(),
        );

        for _ in 0..50 {
            let accuracy = provider.step().accuracy_meters.unwrap();
            assert!(DEFAULT_ACCURACY_RANGE.contains(&accuracy));
        }
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_non_finite_step_uses_default(#[case] step_degrees: f64) {
        let mut provider = SimulatedProvider::new(
            &SourceConfig::builder()
                .step_degrees(step_degrees)
                .rng_seed(8)
                .build(),
        );
        let (lat, lon) = provider.position();

        let sample = provider.step();
        assert!((sample.latitude - lat).abs() <= DEFAULT_STEP_DEGREES);
        assert!((sample.longitude - lon).abs() <= DEFAULT_STEP_DEGREES);
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = seeded(42);
        let mut b = seeded(42);

        for _ in 0..10 {
            let (sa, sb) = (a.step(), b.step());
            assert_eq!(sa.latitude, sb.latitude);
            assert_eq!(sa.longitude, sb.longitude);
            assert_eq!(sa.accuracy_meters, sb.accuracy_meters);
        }
    }
}
