use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for sanitation workers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for citizens filing complaints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitizenId(pub String);

impl fmt::Display for CitizenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric complaint identifier, allocated by the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplaintId(pub u64);

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed worker categories determining eligible task assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerType {
    WasteCollector,
    Sweeper,
}

impl WorkerType {
    pub fn label(self) -> &'static str {
        match self {
            WorkerType::WasteCollector => "WASTE_COLLECTOR",
            WorkerType::Sweeper => "SWEEPER",
        }
    }

    /// Parses the wire/CSV spelling, tolerating case and surrounding noise.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "WASTE_COLLECTOR" => Some(WorkerType::WasteCollector),
            "SWEEPER" => Some(WorkerType::Sweeper),
            _ => None,
        }
    }
}

/// Complaint lifecycle. `Pending` is the only assignable state; `Rejected`
/// complaints never reach a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub fn label(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "PENDING",
            ComplaintStatus::InProgress => "IN_PROGRESS",
            ComplaintStatus::Resolved => "RESOLVED",
            ComplaintStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_assignable(self) -> bool {
        matches!(self, ComplaintStatus::Pending)
    }

    /// States in which a worker reference must be present.
    pub fn requires_worker(self) -> bool {
        matches!(self, ComplaintStatus::InProgress | ComplaintStatus::Resolved)
    }
}

/// Historical performance counters backing the scoring function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub assigned_tasks: u32,
    pub completed_tasks: u32,
    pub avg_difficulty: f64,
    pub locality_rating: f64,
    pub citizen_rating: f64,
}

impl WorkerStats {
    /// Completed-over-assigned ratio, defined as 0 for a worker with no
    /// assignment history and clipped to `[0, 1]`.
    pub fn completion_ratio(&self) -> f64 {
        if self.assigned_tasks == 0 {
            return 0.0;
        }
        (f64::from(self.completed_tasks) / f64::from(self.assigned_tasks)).clamp(0.0, 1.0)
    }
}

impl Default for WorkerStats {
    fn default() -> Self {
        Self {
            assigned_tasks: 0,
            completed_tasks: 0,
            avg_difficulty: 0.0,
            locality_rating: 0.0,
            citizen_rating: 0.0,
        }
    }
}

/// Entity-store view of a sanitation worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub locality: String,
    pub worker_type: WorkerType,
    #[serde(flatten)]
    pub stats: WorkerStats,
}

/// Entity-store view of a citizen complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub id: ComplaintId,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub status: ComplaintStatus,
    pub citizen_id: CitizenId,
    pub locality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<WorkerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub filed_at: DateTime<Utc>,
}

impl ComplaintRecord {
    /// A worker reference is present exactly when the complaint has been
    /// dispatched (in progress or resolved).
    pub fn is_consistent(&self) -> bool {
        self.worker.is_some() == self.status.requires_worker()
    }

    pub fn status_view(&self) -> ComplaintStatusView {
        ComplaintStatusView {
            complaint_id: self.id,
            status: self.status.label(),
            worker_id: self.worker.clone(),
            filed_at: self.filed_at,
        }
    }
}

/// Sanitized complaint projection returned by status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintStatusView {
    pub complaint_id: ComplaintId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
    pub filed_at: DateTime<Utc>,
}

/// Task difficulty on the 1-10 scale used by the scoring model. Out-of-range
/// values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskDifficulty(u8);

impl TaskDifficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Keyword heuristic estimating difficulty from free-text complaint
    /// descriptions, used when an admin does not supply an estimate.
    pub fn from_description(description: &str) -> Self {
        let text = description.to_lowercase();
        if text.contains("illegal dumping") || text.contains("construction waste") {
            Self(8)
        } else if text.contains("overflowing") || text.contains("not collected") {
            Self(6)
        } else if text.contains("sweeping") || text.contains("leaves") {
            Self(4)
        } else {
            Self::default()
        }
    }
}

impl Default for TaskDifficulty {
    fn default() -> Self {
        Self(5)
    }
}

impl<'de> Deserialize<'de> for TaskDifficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        Ok(TaskDifficulty::new(raw))
    }
}

/// Transient projection of a worker plus the computed suitability score.
/// Built per recommendation request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedWorker {
    pub id: WorkerId,
    pub name: String,
    pub locality: String,
    pub worker_type: WorkerType,
    pub assigned_tasks: u32,
    pub completed_tasks: u32,
    pub avg_difficulty: f64,
    pub locality_rating: f64,
    pub citizen_rating: f64,
    pub predicted_score: f64,
}

impl RecommendedWorker {
    pub fn project(worker: WorkerRecord, predicted_score: f64) -> Self {
        Self {
            id: worker.id,
            name: worker.name,
            locality: worker.locality,
            worker_type: worker.worker_type,
            assigned_tasks: worker.stats.assigned_tasks,
            completed_tasks: worker.stats.completed_tasks,
            avg_difficulty: worker.stats.avg_difficulty,
            locality_rating: worker.stats.locality_rating,
            citizen_rating: worker.stats.citizen_rating,
            predicted_score,
        }
    }
}
