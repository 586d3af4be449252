use std::ops::Range;
use std::time::Duration;

use bon::Builder;

/// Latitude and longitude the simulated walk starts from (São Paulo).
pub const DEFAULT_ORIGIN: (f64, f64) = (-23.550520, -46.633308);

/// Largest per-axis change, in degrees, between two simulated samples.
pub const DEFAULT_STEP_DEGREES: f64 = 0.00005;

/// Range simulated accuracy values are drawn from, in meters.
pub const DEFAULT_ACCURACY_RANGE: Range<f64> = 5.0..15.0;

/// Configuration for a [`PositionSource`](super::PositionSource).
#[derive(Debug, Clone, Builder)]
pub struct SourceConfig {
    /// Upper bound on how long a live read may take before it counts as a timeout.
    #[builder(default = Duration::from_secs(10))]
    pub timeout: Duration,

    /// Ask the sensor for its highest available precision.
    #[builder(default = true)]
    pub high_accuracy: bool,

    /// Oldest cached fix the sensor may answer with. Zero rejects cached answers.
    #[builder(default = Duration::ZERO)]
    pub maximum_age: Duration,

    /// Starting coordinate of the simulated walk as `(latitude, longitude)`.
    #[builder(default = DEFAULT_ORIGIN)]
    pub origin: (f64, f64),

    /// Largest per-sample change, in degrees, applied to each axis of the simulated walk.
    /// A non-finite value falls back to [`DEFAULT_STEP_DEGREES`].
    #[builder(default = DEFAULT_STEP_DEGREES)]
    pub step_degrees: f64,

    /// Range simulated accuracy values are drawn from, in meters.
    ///
    /// An empty range with finite bounds yields its start every time. Reversed or non-finite
    /// bounds fall back to [`DEFAULT_ACCURACY_RANGE`].
    #[builder(default = DEFAULT_ACCURACY_RANGE)]
    pub accuracy_range: Range<f64>,

    /// Seed for the simulated walk. Seeded from the OS when not specified.
    pub rng_seed: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
