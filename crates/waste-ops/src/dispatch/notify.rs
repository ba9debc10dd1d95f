use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

/// Event categories emitted by the dispatch core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    TaskAssigned,
    ComplaintFiled,
}

impl NotificationKind {
    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::TaskAssigned => "TASK_ASSIGNED",
            NotificationKind::ComplaintFiled => "COMPLAINT_FILED",
        }
    }
}

/// Best-effort notification payload handed to the dispatcher after a state
/// change commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub recipient: String,
    pub details: BTreeMap<String, String>,
}

/// Notification transport failure. Callers log and swallow these; a failed
/// notification never alters the outcome of the operation that produced it.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Outbound notification seam (SMS, e-mail, or push adapters in production).
pub trait NotificationDispatcher: Send + Sync {
    fn notify(&self, event: NotificationEvent) -> Result<(), NotifyError>;
}

/// Dispatcher that records events in the service log and never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDispatcher;

impl NotificationDispatcher for TracingDispatcher {
    fn notify(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        info!(
            kind = event.kind.label(),
            recipient = %event.recipient,
            details = ?event.details,
            "dispatching notification"
        );
        Ok(())
    }
}
