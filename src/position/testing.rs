//! Sensor doubles for tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::SensorError;
use super::sensor::{PositionOptions, Sensor, SensorReading};

pub(crate) fn reading(latitude: f64, longitude: f64) -> SensorReading {
    SensorReading {
        latitude,
        longitude,
        accuracy_meters: 4.0,
    }
}

/// Answers with a fixed script, then reports the position as unavailable.
#[derive(Debug)]
pub(crate) struct ScriptedSensor {
    script: VecDeque<Result<SensorReading, SensorError>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSensor {
    pub(crate) fn new(script: impl IntoIterator<Item = Result<SensorReading, SensorError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Sensor for ScriptedSensor {
    async fn current_position(
        &mut self,
        _options: &PositionOptions,
    ) -> Result<SensorReading, SensorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .pop_front()
            .unwrap_or(Err(SensorError::PositionUnavailable))
    }
}

/// Never answers.
#[derive(Debug)]
pub(crate) struct StalledSensor;

impl Sensor for StalledSensor {
    async fn current_position(
        &mut self,
        _options: &PositionOptions,
    ) -> Result<SensorReading, SensorError> {
        std::future::pending().await
    }
}

/// Answers with the same reading after a fixed delay.
#[derive(Debug)]
pub(crate) struct SlowSensor {
    pub(crate) delay: std::time::Duration,
    pub(crate) reading: SensorReading,
}

impl Sensor for SlowSensor {
    async fn current_position(
        &mut self,
        _options: &PositionOptions,
    ) -> Result<SensorReading, SensorError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reading)
    }
}
