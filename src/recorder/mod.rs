//! The route recorder: drives the pure [`RecorderMachine`] with samples from a
//! [`PositionSource`], on a fixed cadence, and hands finished routes to the [`RouteStore`].

pub mod config;
pub mod error;
pub mod timer;

use std::fmt;
use std::sync::{Arc, Mutex};

use jiff::Timestamp;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::notify::{NoticeLevel, Notifier};
use crate::position::error::SensorError;
use crate::position::sensor::Sensor;
use crate::position::{PositionSource, SourceMode};
use crate::route::{Route, RouteId};
use crate::sample::CoordinateSample;
use crate::state_machine::StateMachine;
use crate::state_machine::recorder::{RecorderInput, RecorderMachine, RecorderOutput};
use crate::state_machine::wrappers::system::SystemResource;
use crate::store::RouteStore;

use self::config::RecorderConfig;
use self::error::RecordingError;
use self::timer::CaptureTimer;

/// Identifies one start-to-stop recording session.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of what the recorder is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderStatus {
    Idle,
    Recording {
        session_id: SessionId,
        name: String,
        started_at: Timestamp,
        sample_count: usize,
    },
}

/// State shared between the recorder handle and its capture timer task.
struct Shared<S> {
    source: tokio::sync::Mutex<PositionSource<S>>,
    machine: Mutex<RecorderMachine>,
    location: watch::Sender<Option<CoordinateSample>>,
    notifier: Arc<dyn Notifier>,
}

impl<S: Sensor> Shared<S> {
    /// Capture a sample, publish it as the current location and, for a session, append it.
    ///
    /// The source lock serializes captures, so samples reach the machine in capture order.
    async fn capture(&self, session_id: Option<SessionId>) -> CoordinateSample {
        let sample = self.source.lock().await.capture_sample().await;
        self.location.send_replace(Some(sample.clone()));

        if let Some(session_id) = session_id {
            for output in self.dispatch(RecorderInput::Sample {
                session_id,
                sample: sample.clone(),
            }) {
                if let RecorderOutput::SampleAppended { sample_count, .. } = output {
                    log_appended(session_id, &sample, sample_count);
                }
            }
        }

        sample
    }

    fn dispatch(&self, input: RecorderInput) -> Vec<RecorderOutput> {
        self.machine
            .lock()
            .expect("recorder machine lock poisoned")
            .dispatch(input)
    }
}

fn log_appended(session_id: SessionId, sample: &CoordinateSample, sample_count: usize) {
    debug!(
        session_id = %session_id,
        lat = sample.latitude,
        lon = sample.longitude,
        sample_count,
        "Captured sample"
    );
}

/// The timer of the running session. Dropping it disarms the timer.
struct ActiveRecording {
    session_id: SessionId,
    _timer: CaptureTimer,
}

/// Records routes from a [`PositionSource`].
///
/// While recording, one sample is captured on [`start`](Self::start) and one more on every tick
/// of the capture interval. The capture timer is owned by the running session: it is disarmed on
/// [`stop`](Self::stop) and when the recorder is dropped mid-recording.
pub struct RouteRecorder<S> {
    shared: Arc<Shared<S>>,
    store: Arc<RouteStore>,
    mode: watch::Receiver<SourceMode>,
    location: watch::Receiver<Option<CoordinateSample>>,
    config: RecorderConfig,
    active: Option<ActiveRecording>,
}

impl<S: Sensor + 'static> RouteRecorder<S> {
    /// Create an idle recorder and capture a preview location.
    ///
    /// The preview only feeds [`current_location`](Self::current_location); it belongs to no
    /// route.
    pub async fn new(
        source: PositionSource<S>,
        store: Arc<RouteStore>,
        notifier: Arc<dyn Notifier>,
        config: RecorderConfig,
    ) -> Self {
        let mode = source.subscribe_mode();
        let (location_tx, location) = watch::channel(None);
        let shared = Arc::new(Shared {
            source: tokio::sync::Mutex::new(source),
            machine: Mutex::new(RecorderMachine::new()),
            location: location_tx,
            notifier,
        });

        let preview = shared.capture(None).await;
        debug!(
            lat = preview.latitude,
            lon = preview.longitude,
            "Captured preview location"
        );

        Self {
            shared,
            store,
            mode,
            location,
            config,
            active: None,
        }
    }

    /// Begin recording a route called `name`.
    ///
    /// Captures the first sample, then enters the recording state and arms the capture timer.
    /// Nothing is committed while the first capture is pending: dropping this future before it
    /// completes leaves the recorder idle.
    pub async fn start(&mut self, name: &str) -> Result<SessionId, RecordingError> {
        let checked = self
            .shared
            .machine
            .lock()
            .expect("recorder machine lock poisoned")
            .check_start(name);
        if let Err(error) = checked {
            return Err(self.reject(error));
        }

        let (session_id, started_at) = <(SessionId, Timestamp)>::generate();
        let first = self.shared.capture(None).await;

        // Start and the first sample land under one lock, so no session is ever observed empty.
        let outputs = {
            let mut machine = self
                .shared
                .machine
                .lock()
                .expect("recorder machine lock poisoned");
            let mut outputs = machine.dispatch(RecorderInput::Start {
                session_id,
                name: name.to_string(),
                at: started_at,
            });
            outputs.extend(machine.dispatch(RecorderInput::Sample {
                session_id,
                sample: first.clone(),
            }));
            outputs
        };

        for output in outputs {
            match output {
                RecorderOutput::Rejected(error) => return Err(self.reject(error)),
                RecorderOutput::SampleAppended { sample_count, .. } => {
                    log_appended(session_id, &first, sample_count)
                }
                RecorderOutput::Started { .. } | RecorderOutput::Finalized(_) => {}
            }
        }

        info!(session_id = %session_id, name = %name, "Recording started");

        let shared = Arc::clone(&self.shared);
        let timer = CaptureTimer::arm(self.config.capture_interval, move || {
            let shared = Arc::clone(&shared);
            async move {
                shared.capture(Some(session_id)).await;
            }
        });
        self.active = Some(ActiveRecording {
            session_id,
            _timer: timer,
        });

        self.shared
            .notifier
            .notify(NoticeLevel::Success, "Recording started");
        Ok(session_id)
    }

    /// Stop recording and store the finished route.
    ///
    /// The recorder is idle afterwards whatever the outcome. Without any captured sample no
    /// route is created and [`RecordingError::NoSamples`] is returned.
    pub fn stop(&mut self) -> Result<Route, RecordingError> {
        if let Some(active) = self.active.take() {
            debug!(session_id = %active.session_id, "Stopping capture timer");
        }

        let (route_id, ended_at) = <(RouteId, Timestamp)>::generate();

        for output in self.shared.dispatch(RecorderInput::Stop {
            route_id,
            at: ended_at,
        }) {
            match output {
                RecorderOutput::Finalized(route) => {
                    self.store.add(route.clone());
                    self.shared.notifier.notify(
                        NoticeLevel::Success,
                        &format!(
                            "Route \"{}\" saved with {} samples",
                            route.name(),
                            route.sample_count()
                        ),
                    );
                    return Ok(route);
                }
                RecorderOutput::Rejected(error) => return Err(self.reject(error)),
                RecorderOutput::Started { .. } | RecorderOutput::SampleAppended { .. } => {}
            }
        }

        Err(self.reject(RecordingError::NotRecording))
    }

    /// Ask the position source to switch to its live sensor.
    ///
    /// A successful read becomes the current location but is not part of any route.
    ///
    /// Allowed while recording: the running session keeps its samples and every later capture
    /// comes from the sensor. The request waits for any capture in progress to finish first.
    pub async fn request_live_mode(&self) -> Result<CoordinateSample, SensorError> {
        let sample = self.shared.source.lock().await.request_live_mode().await?;
        self.shared.location.send_replace(Some(sample.clone()));
        Ok(sample)
    }

    fn reject(&self, error: RecordingError) -> RecordingError {
        warn!(%error, "Recorder request refused");
        self.shared
            .notifier
            .notify(NoticeLevel::Error, &error.to_string());
        error
    }
}

impl<S> RouteRecorder<S> {
    pub fn status(&self) -> RecorderStatus {
        let machine = self
            .shared
            .machine
            .lock()
            .expect("recorder machine lock poisoned");

        match machine.session() {
            Some(session) => RecorderStatus::Recording {
                session_id: session.session_id,
                name: session.route_name.clone(),
                started_at: session.started_at,
                sample_count: session.samples.len(),
            },
            None => RecorderStatus::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.status(), RecorderStatus::Recording { .. })
    }

    pub fn mode(&self) -> SourceMode {
        *self.mode.borrow()
    }

    pub fn subscribe_mode(&self) -> watch::Receiver<SourceMode> {
        self.mode.clone()
    }

    /// The most recently captured location, if any.
    pub fn current_location(&self) -> Option<CoordinateSample> {
        self.location.borrow().clone()
    }

    /// The current location if it changed since the last poll.
    ///
    /// Intermediate updates between two polls are skipped; only the latest is returned.
    pub fn poll_location(&mut self) -> Option<CoordinateSample> {
        match self.location.has_changed() {
            Ok(true) => self.location.borrow_and_update().clone(),
            _ => None,
        }
    }

    /// Watch the current location, e.g. to redraw a map marker on every capture.
    pub fn subscribe_location(&self) -> watch::Receiver<Option<CoordinateSample>> {
        self.location.clone()
    }

    pub fn store(&self) -> &Arc<RouteStore> {
        &self.store
    }
}
