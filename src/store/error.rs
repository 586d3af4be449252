//! Error types for route export.

/// Failure to serialize a route into an export format.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode route as JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode route as CSV")]
    Csv(#[from] csv::Error),

    #[error("failed to flush export buffer")]
    Io(#[from] std::io::Error),
}
