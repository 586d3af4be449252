use std::collections::VecDeque;

use jiff::Timestamp;
use tracing::debug;

use super::StateMachine;
use crate::recorder::SessionId;
use crate::recorder::error::RecordingError;
use crate::route::{Route, RouteId};
use crate::sample::CoordinateSample;

/// An in-progress recording. Lives only while the machine is [`RecorderState::Recording`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSession {
    pub session_id: SessionId,
    pub route_name: String,
    pub started_at: Timestamp,
    pub samples: Vec<CoordinateSample>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording(RecordingSession),
}

/// The Idle/Recording machine that accumulates samples and seals them into a [`Route`].
///
/// Samples are tagged with the session they were captured for. A sample that arrives for any
/// other session, or while idle, is dropped, so a capture still in flight when a session stops
/// can never leak into the next one.
#[derive(Debug, Default)]
pub struct RecorderMachine {
    state: RecorderState,
    outputs: VecDeque<RecorderOutput>,
}

impl RecorderMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn session(&self) -> Option<&RecordingSession> {
        match &self.state {
            RecorderState::Recording(session) => Some(session),
            RecorderState::Idle => None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.session().is_some()
    }

    /// Whether a `Start` for `name` would be accepted, without changing any state.
    pub fn check_start(&self, name: &str) -> Result<(), RecordingError> {
        if self.is_recording() {
            return Err(RecordingError::AlreadyRecording);
        }

        if name.trim().is_empty() {
            return Err(RecordingError::EmptyName);
        }

        Ok(())
    }

    fn start(&mut self, session_id: SessionId, name: String, at: Timestamp) {
        if let Err(error) = self.check_start(&name) {
            self.reject(error);
            return;
        }

        self.state = RecorderState::Recording(RecordingSession {
            session_id,
            route_name: name.clone(),
            started_at: at,
            samples: Vec::new(),
        });
        self.outputs
            .push_back(RecorderOutput::Started { session_id, name });
    }

    fn append(&mut self, session_id: SessionId, sample: CoordinateSample) {
        match &mut self.state {
            RecorderState::Recording(session) if session.session_id == session_id => {
                session.samples.push(sample);
                self.outputs.push_back(RecorderOutput::SampleAppended {
                    session_id,
                    sample_count: session.samples.len(),
                });
            }
            _ => debug!(session_id = %session_id, "Dropping sample for inactive session"),
        }
    }

    fn stop(&mut self, route_id: RouteId, at: Timestamp) {
        let RecorderState::Recording(session) = std::mem::take(&mut self.state) else {
            self.reject(RecordingError::NotRecording);
            return;
        };

        if session.samples.is_empty() {
            self.reject(RecordingError::NoSamples);
            return;
        }

        // A wall clock stepping backwards must not produce a route that ends before it starts.
        let ended_at = at.max(session.started_at);

        match Route::finalize(
            route_id,
            session.route_name,
            session.samples,
            session.started_at,
            ended_at,
        ) {
            Ok(route) => self.outputs.push_back(RecorderOutput::Finalized(route)),
            Err(error) => self.reject(error.into()),
        }
    }

    fn reject(&mut self, error: RecordingError) {
        self.outputs.push_back(RecorderOutput::Rejected(error));
    }
}

pub enum RecorderInput {
    Start {
        session_id: SessionId,
        name: String,
        at: Timestamp,
    },
    Sample {
        session_id: SessionId,
        sample: CoordinateSample,
    },
    Stop {
        route_id: RouteId,
        at: Timestamp,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecorderOutput {
    Started {
        session_id: SessionId,
        name: String,
    },
    SampleAppended {
        session_id: SessionId,
        sample_count: usize,
    },
    Finalized(Route),
    Rejected(RecordingError),
}

impl StateMachine for RecorderMachine {
    type Input = RecorderInput;
    type Output = RecorderOutput;

    fn process_input(&mut self, input: Self::Input) {
        match input {
            RecorderInput::Start {
                session_id,
                name,
                at,
            } => self.start(session_id, name, at),
            RecorderInput::Sample { session_id, sample } => self.append(session_id, sample),
            RecorderInput::Stop { route_id, at } => self.stop(route_id, at),
        }
    }

    fn poll_output(&mut self) -> Option<Self::Output> {
        self.outputs.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_second(1_700_000_000 + secs).unwrap()
    }

    fn sample(secs: i64) -> CoordinateSample {
        CoordinateSample::new(-23.55, -46.63, at(secs), Some(10.0))
    }

    fn started(name: &str) -> (RecorderMachine, SessionId) {
        let mut machine = RecorderMachine::new();
        let session_id = SessionId::generate();
        let outputs = machine.dispatch(RecorderInput::Start {
            session_id,
            name: name.to_string(),
            at: at(0),
        });
        assert!(matches!(outputs.as_slice(), [RecorderOutput::Started { .. }]));
        (machine, session_id)
    }

    #[test]
    fn test_starts_idle() {
        let machine = RecorderMachine::new();
        assert_eq!(machine.state(), &RecorderState::Idle);
        assert!(!machine.is_recording());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_blank_name_rejected(#[case] name: &str) {
        let mut machine = RecorderMachine::new();

        let outputs = machine.dispatch(RecorderInput::Start {
            session_id: SessionId::generate(),
            name: name.to_string(),
            at: at(0),
        });

        assert_eq!(outputs, vec![RecorderOutput::Rejected(RecordingError::EmptyName)]);
        assert_eq!(machine.state(), &RecorderState::Idle);
    }

    #[test]
    fn test_check_start_leaves_state_alone() {
        let mut machine = RecorderMachine::new();
        assert_eq!(machine.check_start("Walk"), Ok(()));
        assert_eq!(machine.check_start(" "), Err(RecordingError::EmptyName));
        assert_eq!(machine.state(), &RecorderState::Idle);
        assert!(machine.poll_output().is_none());

        let (machine, _) = started("Walk");
        assert_eq!(
            machine.check_start("Other"),
            Err(RecordingError::AlreadyRecording)
        );
    }

    #[test]
    fn test_start_while_recording_rejected() {
        let (mut machine, session_id) = started("Morning Run");

        let outputs = machine.dispatch(RecorderInput::Start {
            session_id: SessionId::generate(),
            name: "Evening Run".to_string(),
            at: at(1),
        });

        assert_eq!(
            outputs,
            vec![RecorderOutput::Rejected(RecordingError::AlreadyRecording)]
        );
        assert_eq!(machine.session().unwrap().session_id, session_id);
        assert_eq!(machine.session().unwrap().route_name, "Morning Run");
    }

    #[test]
    fn test_samples_finalize_in_order() {
        let (mut machine, session_id) = started("Morning Run");

        for secs in [0, 5, 10] {
            machine.dispatch(RecorderInput::Sample {
                session_id,
                sample: sample(secs),
            });
        }

        let outputs = machine.dispatch(RecorderInput::Stop {
            route_id: RouteId::generate(),
            at: at(12),
        });

        let [RecorderOutput::Finalized(route)] = outputs.as_slice() else {
            panic!("expected a finalized route, got {outputs:?}");
        };
        assert_eq!(route.name(), "Morning Run");
        assert_eq!(route.sample_count(), 3);
        assert_eq!(route.samples(), &[sample(0), sample(5), sample(10)]);
        assert_eq!(route.started_at(), at(0));
        assert_eq!(route.ended_at(), Some(at(12)));
        assert_eq!(machine.state(), &RecorderState::Idle);
    }

    #[test]
    fn test_append_reports_count() {
        let (mut machine, session_id) = started("Walk");

        let outputs = machine.dispatch(RecorderInput::Sample {
            session_id,
            sample: sample(0),
        });

        assert_eq!(
            outputs,
            vec![RecorderOutput::SampleAppended {
                session_id,
                sample_count: 1
            }]
        );
    }

    #[test]
    fn test_stop_without_samples() {
        let (mut machine, _) = started("Empty");

        let outputs = machine.dispatch(RecorderInput::Stop {
            route_id: RouteId::generate(),
            at: at(5),
        });

        assert_eq!(outputs, vec![RecorderOutput::Rejected(RecordingError::NoSamples)]);
        assert_eq!(machine.state(), &RecorderState::Idle);
    }

    #[test]
    fn test_stop_while_idle() {
        let mut machine = RecorderMachine::new();

        let outputs = machine.dispatch(RecorderInput::Stop {
            route_id: RouteId::generate(),
            at: at(5),
        });

        assert_eq!(
            outputs,
            vec![RecorderOutput::Rejected(RecordingError::NotRecording)]
        );
    }

    #[test]
    fn test_stale_session_samples_dropped() {
        let (mut machine, _) = started("Current");

        let outputs = machine.dispatch(RecorderInput::Sample {
            session_id: SessionId::generate(),
            sample: sample(1),
        });

        assert!(outputs.is_empty());
        assert!(machine.session().unwrap().samples.is_empty());
    }

    #[test]
    fn test_samples_while_idle_dropped() {
        let mut machine = RecorderMachine::new();

        let outputs = machine.dispatch(RecorderInput::Sample {
            session_id: SessionId::generate(),
            sample: sample(1),
        });

        assert!(outputs.is_empty());
        assert_eq!(machine.state(), &RecorderState::Idle);
    }

    #[test]
    fn test_end_clamped_to_start() {
        let mut machine = RecorderMachine::new();
        let session_id = SessionId::generate();
        machine.dispatch(RecorderInput::Start {
            session_id,
            name: "Clock skew".to_string(),
            at: at(10),
        });
        machine.dispatch(RecorderInput::Sample {
            session_id,
            sample: sample(10),
        });

        let outputs = machine.dispatch(RecorderInput::Stop {
            route_id: RouteId::generate(),
            at: at(3),
        });

        let [RecorderOutput::Finalized(route)] = outputs.as_slice() else {
            panic!("expected a finalized route, got {outputs:?}");
        };
        assert_eq!(route.ended_at(), Some(route.started_at()));
    }
}
