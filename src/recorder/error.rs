//! Error types for recording sessions.

use crate::route::error::RouteInvariantError;

/// A request the recorder refused. Refused requests leave the recorder state unchanged, except
/// that stopping with no samples still returns it to idle.
///
/// The display text of each variant is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordingError {
    #[error("Please enter a route name")]
    EmptyName,

    #[error("No samples recorded")]
    NoSamples,

    #[error("A route is already being recorded")]
    AlreadyRecording,

    #[error("No route is being recorded")]
    NotRecording,

    #[error("Recorded route is invalid: {0}")]
    InvalidRoute(#[from] RouteInvariantError),
}
