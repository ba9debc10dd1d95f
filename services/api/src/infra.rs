use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use waste_ops::dispatch::{
    CitizenId, ComplaintId, ComplaintPatch, ComplaintRecord, ComplaintStatus, DispatchError,
    EntityStore, StoreError, StoreTransaction, TracingDispatcher, WorkerFilter, WorkerId,
    WorkerPatch, WorkerRecord, WorkerStats, WorkerType,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: InMemoryEntityStore,
    pub(crate) notifier: Arc<TracingDispatcher>,
}

#[derive(Debug, Clone)]
struct Tables {
    workers: HashMap<WorkerId, WorkerRecord>,
    complaints: HashMap<ComplaintId, ComplaintRecord>,
    next_complaint_id: u64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            workers: HashMap::new(),
            complaints: HashMap::new(),
            next_complaint_id: 1,
        }
    }
}

impl StoreTransaction for Tables {
    fn worker_mut(&mut self, id: &WorkerId) -> Option<&mut WorkerRecord> {
        self.workers.get_mut(id)
    }

    fn complaint_mut(&mut self, id: ComplaintId) -> Option<&mut ComplaintRecord> {
        self.complaints.get_mut(&id)
    }
}

/// Fields a citizen supplies when filing a complaint.
#[derive(Debug, Clone)]
pub(crate) struct NewComplaint {
    pub(crate) description: String,
    pub(crate) citizen_id: String,
    pub(crate) locality: String,
    pub(crate) image: Option<String>,
}

/// Single-process entity store backing the bundled service. A mutex over the
/// tables plus a clone-and-swap commit gives the transaction guarantee the
/// dispatch core relies on: conflicting assignments serialize, and an aborted
/// transaction leaves no partial writes behind.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEntityStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryEntityStore {
    pub(crate) fn seed_worker(&self, worker: WorkerRecord) {
        let mut guard = self.tables.lock().expect("entity store mutex poisoned");
        guard.workers.insert(worker.id.clone(), worker);
    }

    pub(crate) fn file_complaint(&self, new: NewComplaint) -> ComplaintRecord {
        let mut guard = self.tables.lock().expect("entity store mutex poisoned");
        let id = ComplaintId(guard.next_complaint_id);
        guard.next_complaint_id += 1;

        let complaint = ComplaintRecord {
            id,
            description: new.description,
            image: new.image,
            status: ComplaintStatus::Pending,
            citizen_id: CitizenId(new.citizen_id),
            locality: new.locality,
            worker: None,
            rating: None,
            filed_at: Utc::now(),
        };
        guard.complaints.insert(id, complaint.clone());
        complaint
    }
}

impl EntityStore for InMemoryEntityStore {
    fn find_workers(&self, filter: &WorkerFilter) -> Result<Vec<WorkerRecord>, StoreError> {
        let guard = self.tables.lock().expect("entity store mutex poisoned");
        Ok(guard
            .workers
            .values()
            .filter(|worker| filter.matches(worker))
            .cloned()
            .collect())
    }

    fn find_worker(&self, id: &WorkerId) -> Result<Option<WorkerRecord>, StoreError> {
        let guard = self.tables.lock().expect("entity store mutex poisoned");
        Ok(guard.workers.get(id).cloned())
    }

    fn find_complaint(&self, id: ComplaintId) -> Result<Option<ComplaintRecord>, StoreError> {
        let guard = self.tables.lock().expect("entity store mutex poisoned");
        Ok(guard.complaints.get(&id).cloned())
    }

    fn update_worker(&self, id: &WorkerId, patch: WorkerPatch) -> Result<WorkerRecord, StoreError> {
        let mut guard = self.tables.lock().expect("entity store mutex poisoned");
        let worker = guard.workers.get_mut(id).ok_or(StoreError::NotFound)?;
        patch.apply(worker);
        Ok(worker.clone())
    }

    fn update_complaint(
        &self,
        id: ComplaintId,
        patch: ComplaintPatch,
    ) -> Result<ComplaintRecord, StoreError> {
        let mut guard = self.tables.lock().expect("entity store mutex poisoned");
        let complaint = guard.complaints.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(complaint);
        Ok(complaint.clone())
    }

    fn transaction(
        &self,
        op: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), DispatchError>,
    ) -> Result<(), DispatchError> {
        let mut guard = self.tables.lock().expect("entity store mutex poisoned");
        let mut staged = guard.clone();
        op(&mut staged)?;
        *guard = staged;
        Ok(())
    }
}

/// Demo roster used by `serve --seed-demo` and the CLI demo.
pub(crate) fn sample_workers() -> Vec<WorkerRecord> {
    let worker = |id: &str, name: &str, locality: &str, worker_type, stats| WorkerRecord {
        id: WorkerId(id.to_string()),
        name: name.to_string(),
        phone_number: "9876543210".to_string(),
        email: format!("{id}@sanitation.example"),
        locality: locality.to_string(),
        worker_type,
        stats,
    };

    vec![
        worker(
            "w-101",
            "Asha Kumari",
            "MG Road",
            WorkerType::Sweeper,
            WorkerStats {
                assigned_tasks: 10,
                completed_tasks: 9,
                avg_difficulty: 4.2,
                locality_rating: 4.5,
                citizen_rating: 4.8,
            },
        ),
        worker(
            "w-102",
            "Binod Yadav",
            "MG Road",
            WorkerType::WasteCollector,
            WorkerStats {
                assigned_tasks: 22,
                completed_tasks: 17,
                avg_difficulty: 6.1,
                locality_rating: 3.8,
                citizen_rating: 4.0,
            },
        ),
        worker(
            "w-103",
            "Chitra Devi",
            "Jayanagar",
            WorkerType::Sweeper,
            WorkerStats {
                assigned_tasks: 0,
                completed_tasks: 0,
                avg_difficulty: 0.0,
                locality_rating: 3.0,
                citizen_rating: 0.0,
            },
        ),
        worker(
            "w-104",
            "Deepak Singh",
            "Jayanagar",
            WorkerType::WasteCollector,
            WorkerStats {
                assigned_tasks: 35,
                completed_tasks: 20,
                avg_difficulty: 7.4,
                locality_rating: 2.9,
                citizen_rating: 3.1,
            },
        ),
    ]
}
