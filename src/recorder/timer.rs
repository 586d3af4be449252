use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// A repeating capture task that lives exactly as long as this guard.
///
/// The first tick fires one `period` after arming. Dropping the guard aborts the task, including
/// a tick that is still awaiting its capture.
#[derive(Debug)]
pub struct CaptureTimer {
    handle: JoinHandle<()>,
}

impl CaptureTimer {
    pub fn arm<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // tokio intervals reject a zero period.
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                on_tick().await;
            }
        });

        debug!(period_ms = period.as_millis(), "Capture timer armed");
        Self { handle }
    }
}

impl Drop for CaptureTimer {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Capture timer disarmed");
    }
}
