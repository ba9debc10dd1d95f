use super::domain::{ComplaintId, ComplaintRecord, ComplaintStatus, WorkerId, WorkerRecord, WorkerType};
use super::DispatchError;

/// Equality filter over the worker table; an absent field means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerFilter {
    pub locality: Option<String>,
    pub worker_type: Option<WorkerType>,
}

impl WorkerFilter {
    pub fn matches(&self, worker: &WorkerRecord) -> bool {
        if let Some(locality) = &self.locality {
            if worker.locality != *locality {
                return false;
            }
        }
        if let Some(worker_type) = self.worker_type {
            if worker.worker_type != worker_type {
                return false;
            }
        }
        true
    }
}

/// Partial update for a worker record; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerPatch {
    pub assigned_tasks: Option<u32>,
    pub completed_tasks: Option<u32>,
    pub avg_difficulty: Option<f64>,
    pub locality_rating: Option<f64>,
    pub citizen_rating: Option<f64>,
}

impl WorkerPatch {
    pub fn apply(&self, worker: &mut WorkerRecord) {
        if let Some(assigned_tasks) = self.assigned_tasks {
            worker.stats.assigned_tasks = assigned_tasks;
        }
        if let Some(completed_tasks) = self.completed_tasks {
            worker.stats.completed_tasks = completed_tasks;
        }
        if let Some(avg_difficulty) = self.avg_difficulty {
            worker.stats.avg_difficulty = avg_difficulty;
        }
        if let Some(locality_rating) = self.locality_rating {
            worker.stats.locality_rating = locality_rating;
        }
        if let Some(citizen_rating) = self.citizen_rating {
            worker.stats.citizen_rating = citizen_rating;
        }
    }
}

/// Partial update for a complaint record. The worker reference uses a nested
/// `Option` so a patch can explicitly clear it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintPatch {
    pub status: Option<ComplaintStatus>,
    pub worker: Option<Option<WorkerId>>,
    pub rating: Option<u8>,
}

impl ComplaintPatch {
    pub fn apply(&self, complaint: &mut ComplaintRecord) {
        if let Some(status) = self.status {
            complaint.status = status;
        }
        if let Some(worker) = &self.worker {
            complaint.worker = worker.clone();
        }
        if let Some(rating) = self.rating {
            complaint.rating = Some(rating);
        }
    }
}

/// Failure modes of the entity store itself, as opposed to the dispatch-level
/// taxonomy layered on top of it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("entity store unavailable: {0}")]
    Unavailable(String),
}

/// Mutable view over the store inside a transaction. Records obtained here
/// are committed together or not at all.
pub trait StoreTransaction {
    fn worker_mut(&mut self, id: &WorkerId) -> Option<&mut WorkerRecord>;
    fn complaint_mut(&mut self, id: ComplaintId) -> Option<&mut ComplaintRecord>;
}

/// Persistence seam for the dispatch core. Production backs this with a
/// relational database; tests and the bundled service use in-memory tables.
///
/// `transaction` must serialize conflicting calls and guarantee that either
/// every mutation performed through the [`StoreTransaction`] view becomes
/// visible or none does.
pub trait EntityStore: Send + Sync {
    fn find_workers(&self, filter: &WorkerFilter) -> Result<Vec<WorkerRecord>, StoreError>;

    fn find_worker(&self, id: &WorkerId) -> Result<Option<WorkerRecord>, StoreError>;

    fn find_complaint(&self, id: ComplaintId) -> Result<Option<ComplaintRecord>, StoreError>;

    fn update_worker(&self, id: &WorkerId, patch: WorkerPatch) -> Result<WorkerRecord, StoreError>;

    fn update_complaint(
        &self,
        id: ComplaintId,
        patch: ComplaintPatch,
    ) -> Result<ComplaintRecord, StoreError>;

    fn transaction(
        &self,
        op: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), DispatchError>,
    ) -> Result<(), DispatchError>;
}
