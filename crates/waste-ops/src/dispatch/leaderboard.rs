use std::io::Read;

use serde::Deserialize;

use super::domain::{RecommendedWorker, WorkerId, WorkerRecord, WorkerStats, WorkerType};
use super::scoring::{predicted_score, ScoringWeights};

/// Failure while building a leaderboard from a worker-stats export.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("failed to read worker stats csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown worker type '{value}'")]
    UnknownWorkerType { row: usize, value: String },
}

/// Workers ranked by predicted score, computed from a CSV export of the
/// worker table (the same format the analytics pipeline produces).
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<RecommendedWorker>,
}

impl Leaderboard {
    /// Expected columns: `worker_id,name,locality,worker_type,assigned_tasks,
    /// completed_tasks,avg_difficulty,locality_rating,citizen_rating`.
    /// Surrounding whitespace is tolerated.
    pub fn from_reader<R: Read>(
        reader: R,
        weights: &ScoringWeights,
    ) -> Result<Self, LeaderboardError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for (index, record) in csv_reader.deserialize::<WorkerRow>().enumerate() {
            let row = record?;
            let worker = row.into_record(index)?;
            // Exported rows for workers with no assignment history sometimes
            // carry a stale difficulty average; treat it as zero.
            let mut stats = worker.stats;
            if stats.assigned_tasks == 0 {
                stats.avg_difficulty = 0.0;
            }
            let score = predicted_score(&stats, stats.avg_difficulty, weights);
            let mut entry = RecommendedWorker::project(worker, score);
            entry.avg_difficulty = stats.avg_difficulty;
            entries.push(entry);
        }

        entries.sort_by(|a, b| {
            b.predicted_score
                .total_cmp(&a.predicted_score)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RecommendedWorker] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RecommendedWorker> {
        self.entries
    }
}

#[derive(Debug, Deserialize)]
struct WorkerRow {
    worker_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    worker_type: String,
    assigned_tasks: u32,
    completed_tasks: u32,
    #[serde(default)]
    avg_difficulty: f64,
    #[serde(default)]
    locality_rating: f64,
    #[serde(default)]
    citizen_rating: f64,
}

impl WorkerRow {
    fn into_record(self, index: usize) -> Result<WorkerRecord, LeaderboardError> {
        let worker_type = WorkerType::parse(&self.worker_type).ok_or_else(|| {
            LeaderboardError::UnknownWorkerType {
                // Header occupies the first line of the export.
                row: index + 2,
                value: self.worker_type.clone(),
            }
        })?;

        let name = self
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Worker {}", self.worker_id));

        Ok(WorkerRecord {
            id: WorkerId(self.worker_id),
            name,
            phone_number: String::new(),
            email: String::new(),
            locality: self.locality.unwrap_or_default(),
            worker_type,
            stats: WorkerStats {
                assigned_tasks: self.assigned_tasks,
                completed_tasks: self.completed_tasks,
                avg_difficulty: self.avg_difficulty,
                locality_rating: self.locality_rating,
                citizen_rating: self.citizen_rating,
            },
        })
    }
}
