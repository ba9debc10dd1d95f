use super::common::stats;
use crate::dispatch::scoring::{predicted_score, ScoringWeights};

fn score(assigned: u32, completed: u32, avg: f64, locality: f64, citizen: f64) -> f64 {
    predicted_score(
        &stats(assigned, completed, avg, locality, citizen),
        5.0,
        &ScoringWeights::default(),
    )
}

#[test]
fn score_is_finite_for_fresh_worker() {
    let value = score(0, 0, 0.0, 0.0, 0.0);
    assert!(value.is_finite());
}

#[test]
fn score_is_finite_for_degenerate_stats() {
    let weights = ScoringWeights::default();
    let broken = stats(3, 10, f64::NAN, f64::INFINITY, f64::NEG_INFINITY);
    assert!(predicted_score(&broken, f64::NAN, &weights).is_finite());
    assert!(predicted_score(&broken, 42.0, &weights).is_finite());
}

#[test]
fn score_is_deterministic() {
    let weights = ScoringWeights::default();
    let record = stats(12, 9, 4.2, 3.5, 4.8);
    let first = predicted_score(&record, 7.0, &weights);
    let second = predicted_score(&record, 7.0, &weights);
    assert_eq!(first, second);
}

#[test]
fn lighter_load_never_scores_lower() {
    // Same completed count, increasing backlog.
    let mut previous = f64::INFINITY;
    for assigned in [5u32, 10, 20, 50, 200] {
        let value = score(assigned, 5, 3.0, 4.0, 4.0);
        assert!(
            value <= previous,
            "load {assigned} scored {value} above lighter load {previous}"
        );
        previous = value;
    }
}

#[test]
fn better_ratings_never_score_lower() {
    let low_citizen = score(10, 8, 3.0, 4.0, 2.0);
    let high_citizen = score(10, 8, 3.0, 4.0, 5.0);
    assert!(high_citizen >= low_citizen);

    let low_locality = score(10, 8, 3.0, 1.0, 4.0);
    let high_locality = score(10, 8, 3.0, 5.0, 4.0);
    assert!(high_locality >= low_locality);
}

#[test]
fn higher_completion_ratio_never_scores_lower() {
    let slacker = score(10, 2, 3.0, 4.0, 4.0);
    let steady = score(10, 8, 3.0, 4.0, 4.0);
    let perfect = score(10, 10, 3.0, 4.0, 4.0);
    assert!(steady >= slacker);
    assert!(perfect >= steady);
}

#[test]
fn ratings_out_of_range_are_clamped_not_rewarded() {
    let capped = score(10, 8, 3.0, 5.0, 5.0);
    let inflated = score(10, 8, 3.0, 50.0, 50.0);
    assert_eq!(capped, inflated);
}

#[test]
fn difficulty_fit_prefers_matching_experience() {
    let weights = ScoringWeights::default();
    let veteran = stats(10, 9, 8.0, 4.0, 4.0);
    let on_hard_task = predicted_score(&veteran, 8.0, &weights);
    let on_easy_task = predicted_score(&veteran, 1.0, &weights);
    assert!(on_hard_task > on_easy_task);
}
