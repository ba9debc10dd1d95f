use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::dispatch::domain::{
    CitizenId, ComplaintId, ComplaintRecord, ComplaintStatus, WorkerId, WorkerRecord, WorkerStats,
    WorkerType,
};
use crate::dispatch::notify::{NotificationDispatcher, NotificationEvent, NotifyError};
use crate::dispatch::service::DispatchService;
use crate::dispatch::store::{
    ComplaintPatch, EntityStore, StoreError, StoreTransaction, WorkerFilter, WorkerPatch,
};
use crate::dispatch::DispatchError;

#[derive(Debug, Clone, Default)]
struct Tables {
    workers: HashMap<WorkerId, WorkerRecord>,
    complaints: HashMap<ComplaintId, ComplaintRecord>,
}

impl StoreTransaction for Tables {
    fn worker_mut(&mut self, id: &WorkerId) -> Option<&mut WorkerRecord> {
        self.workers.get_mut(id)
    }

    fn complaint_mut(&mut self, id: ComplaintId) -> Option<&mut ComplaintRecord> {
        self.complaints.get_mut(&id)
    }
}

/// In-memory store double with the same clone-and-swap commit discipline the
/// service binary uses.
#[derive(Debug, Default)]
pub(super) struct MemoryStore {
    inner: Mutex<Tables>,
}

impl MemoryStore {
    pub(super) fn seed_worker(&self, worker: WorkerRecord) {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.workers.insert(worker.id.clone(), worker);
    }

    pub(super) fn seed_complaint(&self, complaint: ComplaintRecord) {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.complaints.insert(complaint.id, complaint);
    }
}

impl EntityStore for MemoryStore {
    fn find_workers(&self, filter: &WorkerFilter) -> Result<Vec<WorkerRecord>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .workers
            .values()
            .filter(|worker| filter.matches(worker))
            .cloned()
            .collect())
    }

    fn find_worker(&self, id: &WorkerId) -> Result<Option<WorkerRecord>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.workers.get(id).cloned())
    }

    fn find_complaint(&self, id: ComplaintId) -> Result<Option<ComplaintRecord>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.complaints.get(&id).cloned())
    }

    fn update_worker(&self, id: &WorkerId, patch: WorkerPatch) -> Result<WorkerRecord, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let worker = guard.workers.get_mut(id).ok_or(StoreError::NotFound)?;
        patch.apply(worker);
        Ok(worker.clone())
    }

    fn update_complaint(
        &self,
        id: ComplaintId,
        patch: ComplaintPatch,
    ) -> Result<ComplaintRecord, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let complaint = guard.complaints.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(complaint);
        Ok(complaint.clone())
    }

    fn transaction(
        &self,
        op: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), DispatchError>,
    ) -> Result<(), DispatchError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let mut staged = guard.clone();
        op(&mut staged)?;
        *guard = staged;
        Ok(())
    }
}

/// Store double that fails every call, for 500-path coverage.
#[derive(Debug, Default)]
pub(super) struct UnavailableStore;

impl EntityStore for UnavailableStore {
    fn find_workers(&self, _filter: &WorkerFilter) -> Result<Vec<WorkerRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn find_worker(&self, _id: &WorkerId) -> Result<Option<WorkerRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn find_complaint(&self, _id: ComplaintId) -> Result<Option<ComplaintRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn update_worker(
        &self,
        _id: &WorkerId,
        _patch: WorkerPatch,
    ) -> Result<WorkerRecord, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn update_complaint(
        &self,
        _id: ComplaintId,
        _patch: ComplaintPatch,
    ) -> Result<ComplaintRecord, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn transaction(
        &self,
        _op: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), DispatchError>,
    ) -> Result<(), DispatchError> {
        Err(DispatchError::Store("connection refused".to_string()))
    }
}

#[derive(Debug, Default)]
pub(super) struct RecordingDispatcher {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingDispatcher {
    pub(super) fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn notify(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(event);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct FailingDispatcher;

impl NotificationDispatcher for FailingDispatcher {
    fn notify(&self, _event: NotificationEvent) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) fn stats(
    assigned_tasks: u32,
    completed_tasks: u32,
    avg_difficulty: f64,
    locality_rating: f64,
    citizen_rating: f64,
) -> WorkerStats {
    WorkerStats {
        assigned_tasks,
        completed_tasks,
        avg_difficulty,
        locality_rating,
        citizen_rating,
    }
}

pub(super) fn worker(
    id: &str,
    locality: &str,
    worker_type: WorkerType,
    stats: WorkerStats,
) -> WorkerRecord {
    WorkerRecord {
        id: WorkerId(id.to_string()),
        name: format!("Worker {id}"),
        phone_number: "9000000000".to_string(),
        email: format!("{id}@sanitation.example"),
        locality: locality.to_string(),
        worker_type,
        stats,
    }
}

pub(super) fn pending_complaint(id: u64, locality: &str) -> ComplaintRecord {
    ComplaintRecord {
        id: ComplaintId(id),
        description: "Garbage not collected near the market".to_string(),
        image: None,
        status: ComplaintStatus::Pending,
        citizen_id: CitizenId("cit-100".to_string()),
        locality: locality.to_string(),
        worker: None,
        rating: None,
        filed_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).single().expect("valid timestamp"),
    }
}

pub(super) fn build_service() -> (
    Arc<DispatchService<MemoryStore, RecordingDispatcher>>,
    Arc<MemoryStore>,
    Arc<RecordingDispatcher>,
) {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = Arc::new(DispatchService::new(store.clone(), dispatcher.clone()));
    (service, store, dispatcher)
}
