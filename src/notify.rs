//! The notification collaborator.
//!
//! Notifications are fire-and-forget: a [`Notifier`] never reports back, and the logic emitting a
//! notice never depends on whether anyone received it.

use std::fmt;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Info => f.write_str("info"),
            NoticeLevel::Success => f.write_str("success"),
            NoticeLevel::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Emits every notice as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => error!(%level, "{message}"),
            NoticeLevel::Info | NoticeLevel::Success => info!(%level, "{message}"),
        }
    }
}

/// Forwards notices to a channel, e.g. for a front end draining them on its own loop.
///
/// A closed receiver drops the notice.
impl Notifier for UnboundedSender<Notice> {
    fn notify(&self, level: NoticeLevel, message: &str) {
        let _ = self.send(Notice {
            level,
            message: message.to_string(),
        });
    }
}
