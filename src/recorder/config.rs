use std::time::Duration;

use bon::Builder;

/// Configuration for a [`RouteRecorder`](super::RouteRecorder).
#[derive(Debug, Clone, Builder)]
pub struct RecorderConfig {
    /// Time between captures while recording. The first capture happens immediately on start.
    #[builder(default = Duration::from_secs(5))]
    pub capture_interval: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
