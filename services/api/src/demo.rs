use crate::infra::{sample_workers, InMemoryEntityStore, NewComplaint};
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use waste_ops::dispatch::{
    AssignmentRequest, DispatchService, Leaderboard, RecommendationFilter, RecommendedWorker,
    ScoringWeights, TaskDifficulty, TracingDispatcher,
};
use waste_ops::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct LeaderboardArgs {
    /// Path to a CSV export of the worker table
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Show only the top N workers
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Locality to file the demo complaint in
    #[arg(long, default_value = "MG Road")]
    pub(crate) locality: String,
    /// Complaint description; also drives the difficulty estimate
    #[arg(long, default_value = "Overflowing bins near the flower market")]
    pub(crate) description: String,
    /// Explicit task difficulty (1-10); defaults to a keyword estimate
    #[arg(long)]
    pub(crate) difficulty: Option<u8>,
}

pub(crate) fn run_leaderboard(args: LeaderboardArgs) -> Result<(), AppError> {
    let file = File::open(&args.csv)?;
    let board = Leaderboard::from_reader(file, &ScoringWeights::default())?;

    let mut entries = board.into_entries();
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    println!("Worker leaderboard ({} ranked)", entries.len());
    print_ranked(&entries);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = InMemoryEntityStore::default();
    for worker in sample_workers() {
        store.seed_worker(worker);
    }

    let complaint = store.file_complaint(NewComplaint {
        description: args.description.clone(),
        citizen_id: "cit-demo".to_string(),
        locality: args.locality.clone(),
        image: None,
    });
    println!(
        "Filed complaint #{} in {}: {}",
        complaint.id, complaint.locality, complaint.description
    );

    let difficulty = args
        .difficulty
        .map(TaskDifficulty::new)
        .unwrap_or_else(|| TaskDifficulty::from_description(&args.description));
    println!("Estimated task difficulty: {}", difficulty.value());

    let service = DispatchService::new(Arc::new(store), Arc::new(TracingDispatcher));

    let ranked = service.recommend(RecommendationFilter {
        locality: Some(args.locality),
        task_difficulty: Some(difficulty),
        ..RecommendationFilter::default()
    })?;

    if ranked.is_empty() {
        println!("No workers available in that locality.");
        return Ok(());
    }

    println!("Recommended workers:");
    print_ranked(&ranked);

    let receipt = service.assign(AssignmentRequest {
        worker_id: ranked[0].id.clone(),
        complaint_id: complaint.id,
        task_difficulty: Some(difficulty),
    })?;
    println!(
        "Assigned complaint #{} to {} (task count now {})",
        receipt.complaint_id, receipt.worker_id, receipt.new_task_count
    );

    let refreshed = service.complaint(receipt.complaint_id)?;
    println!(
        "Complaint #{} is now {}",
        refreshed.id,
        refreshed.status.label()
    );

    Ok(())
}

fn print_ranked(entries: &[RecommendedWorker]) {
    for (position, entry) in entries.iter().enumerate() {
        println!(
            "  {:>2}. {:<20} {:<16} {:<16} score {:.3} (load {}, done {}, ratings {:.1}/{:.1})",
            position + 1,
            entry.name,
            entry.worker_type.label(),
            entry.locality,
            entry.predicted_score,
            entry.assigned_tasks,
            entry.completed_tasks,
            entry.locality_rating,
            entry.citizen_rating,
        );
    }
}
