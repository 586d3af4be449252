//! Error types for live position reads.

/// Why a live position read failed.
///
/// The display text of each variant is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable")]
    PositionUnavailable,

    #[error("Location request timeout")]
    Timeout,

    #[error("Geolocation is not supported on this device")]
    Unsupported,
}
