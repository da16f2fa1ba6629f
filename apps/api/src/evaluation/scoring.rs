//! Weighted overall score and performance-band lookup.

use crate::evaluation::EvaluationData;
use crate::rubric::{Criterion, PerformanceBand};

/// Weighted overall percent: each criterion contributes score/5 of its weight.
/// Scores are zipped with criteria by position (the repair layer guarantees
/// equal lengths). Result is rounded and clamped to 0..=100.
pub fn overall_percent(data: &EvaluationData, criteria: &[Criterion]) -> u32 {
    let total: f64 = data
        .scores
        .iter()
        .zip(criteria)
        .map(|(score, criterion)| {
            f64::from(score.score.clamp(1, 5)) / 5.0 * f64::from(criterion.weight)
        })
        .sum();
    total.round().clamp(0.0, 100.0) as u32
}

/// Finds the band whose inclusive range contains `percent`.
/// Validated rubrics tile 0..=100, so this only returns None for rubrics
/// written outside the API.
pub fn band_for(bands: &[PerformanceBand], percent: u32) -> Option<&PerformanceBand> {
    bands
        .iter()
        .find(|b| b.min_percent <= percent && percent <= b.max_percent)
}
