use jiff::Timestamp;
use tracing::debug;

use super::SampleProvider;
use super::error::SensorError;
use super::sensor::{PositionOptions, Sensor, SensorReading};
use crate::sample::CoordinateSample;

/// Samples backed by a real [`Sensor`], each read bounded by the configured timeout.
#[derive(Debug)]
pub struct LiveProvider<S> {
    sensor: S,
    options: PositionOptions,
}

impl<S: Sensor> LiveProvider<S> {
    pub fn new(sensor: S, options: PositionOptions) -> Self {
        Self { sensor, options }
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    async fn read(&mut self) -> Result<SensorReading, SensorError> {
        let read = self.sensor.current_position(&self.options);

        tokio::time::timeout(self.options.timeout, read)
            .await
            .map_err(|_| SensorError::Timeout)?
    }
}

impl<S: Sensor> SampleProvider for LiveProvider<S> {
    type Error = SensorError;

    async fn next_sample(&mut self) -> Result<CoordinateSample, Self::Error> {
        let reading = self.read().await?;

        debug!(
            lat = reading.latitude,
            lon = reading.longitude,
            accuracy = reading.accuracy_meters,
            "Live position read"
        );

        Ok(CoordinateSample::new(
            reading.latitude,
            reading.longitude,
            Timestamp::now(),
            Some(reading.accuracy_meters),
        ))
    }
}
