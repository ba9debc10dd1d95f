use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    ComplaintId, ComplaintRecord, ComplaintStatus, RecommendedWorker, TaskDifficulty, WorkerId,
    WorkerType,
};
use super::notify::{NotificationDispatcher, NotificationEvent, NotificationKind};
use super::scoring::{predicted_score, ScoringWeights};
use super::store::{EntityStore, WorkerFilter};
use super::DispatchError;

/// Filters accepted by the recommendation operation. All fields are optional;
/// an empty filter ranks every worker in the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationFilter {
    pub locality: Option<String>,
    pub worker_type: Option<WorkerType>,
    pub task_difficulty: Option<TaskDifficulty>,
    pub limit: Option<usize>,
}

impl RecommendationFilter {
    fn store_filter(&self) -> WorkerFilter {
        WorkerFilter {
            locality: self.locality.clone(),
            worker_type: self.worker_type,
        }
    }
}

/// Request to link a pending complaint to a worker.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentRequest {
    pub worker_id: WorkerId,
    pub complaint_id: ComplaintId,
    pub task_difficulty: Option<TaskDifficulty>,
}

impl AssignmentRequest {
    /// Checked before any store access so a malformed request cannot cause a
    /// partial state change.
    fn validate(&self) -> Result<(), DispatchError> {
        if self.worker_id.as_str().trim().is_empty() {
            return Err(DispatchError::Validation("workerId must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Confirmation returned after a successful assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentReceipt {
    pub worker_id: WorkerId,
    pub complaint_id: ComplaintId,
    pub new_task_count: u32,
}

/// Facade composing the scoring function, the entity store, and the
/// notification dispatcher.
pub struct DispatchService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    weights: ScoringWeights,
}

impl<S, N> DispatchService<S, N>
where
    S: EntityStore + 'static,
    N: NotificationDispatcher + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self::with_weights(store, notifier, ScoringWeights::default())
    }

    pub fn with_weights(store: Arc<S>, notifier: Arc<N>, weights: ScoringWeights) -> Self {
        Self {
            store,
            notifier,
            weights,
        }
    }

    /// Rank workers matching the filter, best candidate first. Zero matches is
    /// a valid empty result, not an error.
    ///
    /// When the request carries no difficulty estimate, each worker's own
    /// average historical difficulty serves as the hint, so the fit term is
    /// neutral and ranking reduces to track record versus current load.
    pub fn recommend(
        &self,
        filter: RecommendationFilter,
    ) -> Result<Vec<RecommendedWorker>, DispatchError> {
        let workers = self.store.find_workers(&filter.store_filter())?;

        let mut ranked: Vec<RecommendedWorker> = workers
            .into_iter()
            .map(|worker| {
                let hint = filter
                    .task_difficulty
                    .map(|difficulty| f64::from(difficulty.value()))
                    .unwrap_or(worker.stats.avg_difficulty);
                let score = predicted_score(&worker.stats, hint, &self.weights);
                RecommendedWorker::project(worker, score)
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.predicted_score
                .total_cmp(&a.predicted_score)
                .then_with(|| a.id.cmp(&b.id))
        });

        if let Some(limit) = filter.limit {
            ranked.truncate(limit);
        }

        Ok(ranked)
    }

    /// Assign a pending complaint to a worker as one atomic step: the worker's
    /// task counter, running difficulty average, and the complaint's status
    /// and worker reference all change together or not at all.
    ///
    /// A complaint that has already left `PENDING` fails with
    /// [`DispatchError::NotAssignable`]; retrying a timed-out call therefore
    /// cannot double-increment the counter.
    pub fn assign(&self, request: AssignmentRequest) -> Result<AssignmentReceipt, DispatchError> {
        request.validate()?;
        let AssignmentRequest {
            worker_id,
            complaint_id,
            task_difficulty,
        } = request;

        let mut new_task_count = 0u32;
        self.store.transaction(&mut |tx| {
            let complaint = tx
                .complaint_mut(complaint_id)
                .ok_or(DispatchError::ComplaintNotFound(complaint_id))?;
            if !complaint.status.is_assignable() {
                return Err(DispatchError::NotAssignable {
                    id: complaint_id,
                    status: complaint.status,
                });
            }

            let worker = tx
                .worker_mut(&worker_id)
                .ok_or_else(|| DispatchError::WorkerNotFound(worker_id.clone()))?;
            if let Some(difficulty) = task_difficulty {
                // Running average over the pre-increment assignment count.
                let prior = f64::from(worker.stats.assigned_tasks);
                worker.stats.avg_difficulty =
                    (worker.stats.avg_difficulty * prior + f64::from(difficulty.value()))
                        / (prior + 1.0);
            }
            worker.stats.assigned_tasks += 1;
            new_task_count = worker.stats.assigned_tasks;

            let complaint = tx
                .complaint_mut(complaint_id)
                .ok_or(DispatchError::ComplaintNotFound(complaint_id))?;
            complaint.status = ComplaintStatus::InProgress;
            complaint.worker = Some(worker_id.clone());
            Ok(())
        })?;

        let receipt = AssignmentReceipt {
            worker_id,
            complaint_id,
            new_task_count,
        };
        self.notify_assignment(&receipt, task_difficulty);
        Ok(receipt)
    }

    /// Current complaint state, for callers resolving an ambiguous assignment
    /// timeout by re-querying instead of retrying.
    pub fn complaint(&self, id: ComplaintId) -> Result<ComplaintRecord, DispatchError> {
        self.store
            .find_complaint(id)?
            .ok_or(DispatchError::ComplaintNotFound(id))
    }

    fn notify_assignment(&self, receipt: &AssignmentReceipt, difficulty: Option<TaskDifficulty>) {
        let mut details = BTreeMap::new();
        details.insert("complaint_id".to_string(), receipt.complaint_id.to_string());
        details.insert("task_count".to_string(), receipt.new_task_count.to_string());
        if let Some(difficulty) = difficulty {
            details.insert("task_difficulty".to_string(), difficulty.value().to_string());
        }

        let event = NotificationEvent {
            kind: NotificationKind::TaskAssigned,
            recipient: receipt.worker_id.to_string(),
            details,
        };
        if let Err(err) = self.notifier.notify(event) {
            warn!(%err, worker = %receipt.worker_id, "assignment notification failed");
        }
    }
}
