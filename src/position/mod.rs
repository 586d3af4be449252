//! The position source: produces one [`CoordinateSample`] on demand from either a live sensor or a
//! simulated random walk.
//!
//! [`PositionSource::capture_sample`] never fails. A live read that errors switches the source to
//! [`SourceMode::Simulated`] and answers from the simulated walk instead. Only
//! [`PositionSource::request_live_mode`] surfaces [`SensorError`]s to the caller.

pub mod config;
pub mod error;
pub mod live;
pub mod sensor;
pub mod simulated;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::notify::{NoticeLevel, Notifier};
use crate::sample::CoordinateSample;

use self::config::SourceConfig;
use self::error::SensorError;
use self::live::LiveProvider;
use self::sensor::{PositionOptions, Sensor};
use self::simulated::SimulatedProvider;

/// Something able to hand out position samples.
pub trait SampleProvider {
    type Error;

    fn next_sample(
        &mut self,
    ) -> impl Future<Output = Result<CoordinateSample, Self::Error>> + Send;
}

/// Which provider currently answers sample requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceMode {
    Live,
    #[default]
    Simulated,
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Live => f.write_str("live"),
            SourceMode::Simulated => f.write_str("simulated"),
        }
    }
}

pub struct PositionSource<S> {
    live: LiveProvider<S>,
    simulated: SimulatedProvider,
    mode: watch::Sender<SourceMode>,
    notifier: Arc<dyn Notifier>,
}

impl<S> fmt::Debug for PositionSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionSource")
            .field("mode", &*self.mode.borrow())
            .field("simulated", &self.simulated)
            .field("notifier", &"<Notifier>")
            .finish_non_exhaustive()
    }
}

impl<S: Sensor> PositionSource<S> {
    /// Create a source in [`SourceMode::Simulated`].
    pub fn new(sensor: S, config: &SourceConfig, notifier: Arc<dyn Notifier>) -> Self {
        let (mode, _) = watch::channel(SourceMode::Simulated);

        Self {
            live: LiveProvider::new(sensor, PositionOptions::from(config)),
            simulated: SimulatedProvider::new(config),
            mode,
            notifier,
        }
    }

    pub fn mode(&self) -> SourceMode {
        *self.mode.borrow()
    }

    /// Observe mode changes. The mode itself only changes through this source.
    pub fn subscribe_mode(&self) -> watch::Receiver<SourceMode> {
        self.mode.subscribe()
    }

    /// Capture one sample from the provider selected by the current mode.
    ///
    /// Live failures are absorbed: the source drops to simulated mode, emits an informational
    /// notice and returns a simulated sample.
    pub async fn capture_sample(&mut self) -> CoordinateSample {
        if self.mode() == SourceMode::Live {
            match self.live.next_sample().await {
                Ok(sample) => return sample,
                Err(error) => {
                    warn!(%error, "Live position read failed, falling back to simulation");
                    self.set_mode(SourceMode::Simulated);
                    self.notifier.notify(
                        NoticeLevel::Info,
                        "Sensor unavailable, switched to simulated mode",
                    );
                }
            }
        }

        let Ok(sample) = self.simulated.next_sample().await;
        sample
    }

    /// Try a single live read and switch to [`SourceMode::Live`] if it succeeds.
    ///
    /// On failure the source stays (or is put back) in simulated mode and the classified error
    /// is both notified and returned.
    pub async fn request_live_mode(&mut self) -> Result<CoordinateSample, SensorError> {
        match self.live.next_sample().await {
            Ok(sample) => {
                self.set_mode(SourceMode::Live);
                self.notifier
                    .notify(NoticeLevel::Success, "Live positioning activated");
                Ok(sample)
            }
            Err(error) => {
                warn!(%error, "Live positioning request failed");
                self.set_mode(SourceMode::Simulated);
                self.notifier.notify(NoticeLevel::Error, &error.to_string());
                Err(error)
            }
        }
    }

    fn set_mode(&self, mode: SourceMode) {
        let previous = self.mode.send_replace(mode);
        if previous != mode {
            info!(from = %previous, to = %mode, "Position source mode changed");
        }
    }
}
