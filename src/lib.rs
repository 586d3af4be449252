//! Record routes of coordinate samples from a live position sensor or a simulated walk, keep them
//! for the session, and export them as JSON or CSV.
//!
//! Data flows one way: [`PositionSource`] → [`RouteRecorder`] → [`RouteStore`] → export.

pub mod notify;
pub mod position;
pub mod recorder;
pub mod route;
pub mod sample;
pub mod state_machine;
pub mod store;

pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use position::config::SourceConfig;
pub use position::error::SensorError;
pub use position::sensor::{NoSensor, PositionOptions, Sensor, SensorReading};
pub use position::{PositionSource, SourceMode};
pub use recorder::config::RecorderConfig;
pub use recorder::error::RecordingError;
pub use recorder::{RecorderStatus, RouteRecorder, SessionId};
pub use route::{Route, RouteId};
pub use sample::CoordinateSample;
pub use store::RouteStore;
pub use store::export::{Export, ExportFormat, export_file_name};
