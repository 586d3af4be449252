pub mod error;

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sample::CoordinateSample;

use self::error::RouteInvariantError;

/// Unique identifier of a finalized [`Route`].
#[derive(Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(Uuid);

impl RouteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered, time-bounded collection of samples under a user-given name.
///
/// Fields are only reachable through accessors: once a route is finalized no further samples can
/// be appended. Deserialization goes through the same invariant checks as construction, so a parsed
/// route always satisfies `sample_count == samples.len()` and `ended_at >= started_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RouteRecord")]
pub struct Route {
    id: RouteId,
    name: String,
    samples: Vec<CoordinateSample>,
    started_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    ended_at: Option<Timestamp>,
    sample_count: usize,
}

impl Route {
    /// Seal a recorded sample buffer into a route.
    pub fn finalize(
        id: RouteId,
        name: impl Into<String>,
        samples: Vec<CoordinateSample>,
        started_at: Timestamp,
        ended_at: Timestamp,
    ) -> Result<Self, RouteInvariantError> {
        let sample_count = samples.len();
        RouteRecord {
            id,
            name: name.into(),
            samples,
            started_at,
            ended_at: Some(ended_at),
            sample_count,
        }
        .try_into()
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[CoordinateSample] {
        &self.samples
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Elapsed time between start and end, if the route has ended.
    pub fn duration(&self) -> Option<SignedDuration> {
        self.ended_at
            .map(|ended_at| ended_at.duration_since(self.started_at))
    }

    /// Human readable duration, e.g. `"2m 5s"`, or `"In progress"` when there is no end.
    pub fn duration_label(&self) -> String {
        match self.duration() {
            Some(duration) => {
                let secs = duration.as_secs();
                format!("{}m {}s", secs / 60, secs % 60)
            }
            None => "In progress".to_string(),
        }
    }
}

/// Unchecked wire shape of a [`Route`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteRecord {
    id: RouteId,
    name: String,
    samples: Vec<CoordinateSample>,
    started_at: Timestamp,
    #[serde(default)]
    ended_at: Option<Timestamp>,
    sample_count: usize,
}

impl TryFrom<RouteRecord> for Route {
    type Error = RouteInvariantError;

    fn try_from(record: RouteRecord) -> Result<Self, Self::Error> {
        if record.name.trim().is_empty() {
            return Err(RouteInvariantError::EmptyName);
        }

        if record.sample_count != record.samples.len() {
            return Err(RouteInvariantError::SampleCountMismatch {
                sample_count: record.sample_count,
                actual: record.samples.len(),
            });
        }

        if record
            .ended_at
            .is_some_and(|ended_at| ended_at < record.started_at)
        {
            return Err(RouteInvariantError::EndsBeforeStart);
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            samples: record.samples,
            started_at: record.started_at,
            ended_at: record.ended_at,
            sample_count: record.sample_count,
        })
    }
}
