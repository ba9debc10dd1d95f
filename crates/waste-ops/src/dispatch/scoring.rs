use super::domain::WorkerStats;

/// Coefficients for the suitability score. The absolute values are tuning
/// dials; ranking behavior only depends on every weight staying non-negative,
/// which keeps the score monotone in the intended direction for each input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub completion: f64,
    pub citizen_rating: f64,
    pub locality_rating: f64,
    pub load: f64,
    pub difficulty_fit: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            completion: 4.0,
            citizen_rating: 2.0,
            locality_rating: 1.5,
            load: 1.0,
            difficulty_fit: 0.5,
        }
    }
}

/// Assigned-task count at which the load penalty reaches half of its cap.
const LOAD_SATURATION: f64 = 8.0;

const DEFAULT_DIFFICULTY_HINT: f64 = 5.0;

/// Predicted suitability of a worker for a task of the hinted difficulty.
/// Higher is better. Total and deterministic: any finite or non-finite stats
/// record yields a finite score.
///
/// Holding the other inputs fixed, the score never decreases with the
/// completion ratio, citizen rating, or locality rating, and never increases
/// with the current assigned-task load.
pub fn predicted_score(stats: &WorkerStats, difficulty_hint: f64, weights: &ScoringWeights) -> f64 {
    let ratio = stats.completion_ratio();
    let citizen = clamp_finite(stats.citizen_rating, 0.0, 5.0) / 5.0;
    let locality = clamp_finite(stats.locality_rating, 0.0, 5.0) / 5.0;

    let assigned = f64::from(stats.assigned_tasks);
    let load = assigned / (assigned + LOAD_SATURATION);

    let experience = clamp_finite(stats.avg_difficulty, 0.0, 10.0);
    let hint = if difficulty_hint.is_finite() {
        difficulty_hint.clamp(1.0, 10.0)
    } else {
        DEFAULT_DIFFICULTY_HINT
    };
    let fit = 1.0 - (hint - experience).abs() / 10.0;

    weights.completion * ratio
        + weights.citizen_rating * citizen
        + weights.locality_rating * locality
        + weights.difficulty_fit * fit
        - weights.load * load
}

fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}
