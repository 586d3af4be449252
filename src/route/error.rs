//! Error types for route invariants.

/// A route record that violates one of the invariants of a finalized route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteInvariantError {
    #[error("route name must not be empty")]
    EmptyName,

    #[error("sample count {sample_count} does not match {actual} recorded samples")]
    SampleCountMismatch { sample_count: usize, actual: usize },

    #[error("route ended before it started")]
    EndsBeforeStart,
}
