//! Worker recommendation and complaint assignment.
//!
//! Data flows in one direction: the service reads candidate workers from the
//! [`store::EntityStore`], ranks them with [`scoring::predicted_score`], and
//! mutates worker/complaint state through a store transaction when an admin
//! picks a worker. Notifications are fired after commit and never affect the
//! reported outcome.

pub mod domain;
pub mod leaderboard;
pub mod notify;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    CitizenId, ComplaintId, ComplaintRecord, ComplaintStatus, ComplaintStatusView,
    RecommendedWorker, TaskDifficulty, WorkerId, WorkerRecord, WorkerStats, WorkerType,
};
pub use leaderboard::{Leaderboard, LeaderboardError};
pub use notify::{NotificationDispatcher, NotificationEvent, NotificationKind, NotifyError, TracingDispatcher};
pub use router::dispatch_router;
pub use scoring::{predicted_score, ScoringWeights};
pub use service::{AssignmentReceipt, AssignmentRequest, DispatchService, RecommendationFilter};
pub use store::{
    ComplaintPatch, EntityStore, StoreError, StoreTransaction, WorkerFilter, WorkerPatch,
};

/// Error taxonomy for dispatch operations. Validation failures are raised
/// before any mutation; store failures inside a transaction abort the whole
/// transaction.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("worker {0} not found")]
    WorkerNotFound(WorkerId),
    #[error("complaint {0} not found")]
    ComplaintNotFound(ComplaintId),
    #[error("complaint {id} cannot be assigned while {}", .status.label())]
    NotAssignable {
        id: ComplaintId,
        status: ComplaintStatus,
    },
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("entity store failure: {0}")]
    Store(String),
}

impl From<StoreError> for DispatchError {
    fn from(value: StoreError) -> Self {
        DispatchError::Store(value.to_string())
    }
}
