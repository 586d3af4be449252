use std::future::Future;
use std::time::Duration;

use super::config::SourceConfig;
use super::error::SensorError;

/// Request parameters handed to a [`Sensor`] for a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl From<&SourceConfig> for PositionOptions {
    fn from(config: &SourceConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: config.timeout,
            maximum_age: config.maximum_age,
        }
    }
}

/// A raw fix reported by a sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
}

/// A device capability that reports the current position.
///
/// Implementations should honor `options` where they can. The caller enforces
/// [`PositionOptions::timeout`] on its own regardless.
pub trait Sensor: Send {
    fn current_position(
        &mut self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<SensorReading, SensorError>> + Send;
}

/// The sensor of a device without positioning hardware.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSensor;

impl Sensor for NoSensor {
    async fn current_position(
        &mut self,
        _options: &PositionOptions,
    ) -> Result<SensorReading, SensorError> {
        Err(SensorError::Unsupported)
    }
}
