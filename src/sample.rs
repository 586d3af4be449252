use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A single position reading, immutable once captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateSample {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
}

impl CoordinateSample {
    pub fn new(
        latitude: f64,
        longitude: f64,
        captured_at: Timestamp,
        accuracy_meters: Option<f64>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            captured_at,
            accuracy_meters,
        }
    }
}
