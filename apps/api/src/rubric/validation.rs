//! Rubric completeness checks: weights must sum to 100 and performance bands
//! must tile 0–100 with no gaps or overlaps.

use std::collections::HashSet;

use crate::rubric::{Criterion, PerformanceBand};

/// Number of scoring levels every criterion describes (scores 1 through 5).
pub const SCORING_LEVELS: usize = 5;

/// Validates a rubric payload. Returns a list of problems; empty means valid.
pub fn validate_rubric(
    name: &str,
    criteria: &[Criterion],
    bands: &[PerformanceBand],
) -> Vec<String> {
    let mut problems = Vec::new();

    if name.trim().is_empty() {
        problems.push("Rubric name must not be blank".to_string());
    }

    validate_criteria(criteria, &mut problems);
    validate_bands(bands, &mut problems);

    problems
}

fn validate_criteria(criteria: &[Criterion], problems: &mut Vec<String>) {
    if criteria.is_empty() {
        problems.push("Rubric must have at least one criterion".to_string());
        return;
    }

    let mut seen = HashSet::new();
    for (i, criterion) in criteria.iter().enumerate() {
        let label = if criterion.name.trim().is_empty() {
            problems.push(format!("Criterion {} has a blank name", i + 1));
            format!("criterion {}", i + 1)
        } else {
            criterion.name.clone()
        };

        if !seen.insert(criterion.name.trim().to_lowercase()) {
            problems.push(format!("Duplicate criterion name '{}'", criterion.name));
        }
        if criterion.weight == 0 {
            problems.push(format!("Criterion '{label}' must have a weight of at least 1"));
        }
        if criterion.scoring_descriptions.len() != SCORING_LEVELS {
            problems.push(format!(
                "Criterion '{label}' must describe exactly {SCORING_LEVELS} scoring levels, got {}",
                criterion.scoring_descriptions.len()
            ));
        }
        if criterion
            .scoring_descriptions
            .iter()
            .any(|d| d.trim().is_empty())
        {
            problems.push(format!(
                "Criterion '{label}' has a blank scoring description"
            ));
        }
    }

    let total: u64 = criteria.iter().map(|c| u64::from(c.weight)).sum();
    if total != 100 {
        problems.push(format!("Criterion weights must sum to 100, got {total}"));
    }
}

fn validate_bands(bands: &[PerformanceBand], problems: &mut Vec<String>) {
    if bands.is_empty() {
        problems.push("Rubric must have at least one performance band".to_string());
        return;
    }

    let mut seen = HashSet::new();
    let mut ranges_ok = true;
    for band in bands {
        if band.label.trim().is_empty() {
            problems.push("Performance band label must not be blank".to_string());
        }
        if !seen.insert(band.label.trim().to_lowercase()) {
            problems.push(format!("Duplicate band label '{}'", band.label));
        }
        if band.max_percent > 100 {
            problems.push(format!(
                "Band '{}' exceeds 100%: max_percent is {}",
                band.label, band.max_percent
            ));
            ranges_ok = false;
        }
        if band.min_percent > band.max_percent {
            problems.push(format!(
                "Band '{}' has min_percent {} above max_percent {}",
                band.label, band.min_percent, band.max_percent
            ));
            ranges_ok = false;
        }
    }

    // Tiling only makes sense once every individual range is sane.
    if !ranges_ok {
        return;
    }

    // Tiling: sorted by min_percent, bands must start at 0, end at 100, and
    // each must start exactly where the previous one ended.
    let mut sorted: Vec<&PerformanceBand> = bands.iter().collect();
    sorted.sort_by_key(|b| b.min_percent);

    if sorted[0].min_percent != 0 {
        problems.push(format!(
            "Bands must start at 0%, first band '{}' starts at {}",
            sorted[0].label, sorted[0].min_percent
        ));
    }
    if let Some(last) = sorted.last() {
        if last.max_percent != 100 {
            problems.push(format!(
                "Bands must end at 100%, last band '{}' ends at {}",
                last.label, last.max_percent
            ));
        }
    }
    for pair in sorted.windows(2) {
        if pair[1].min_percent != pair[0].max_percent + 1 {
            problems.push(format!(
                "Bands '{}' and '{}' must be contiguous: expected the second to start at {}, got {}",
                pair[0].label,
                pair[1].label,
                pair[0].max_percent + 1,
                pair[1].min_percent
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(name: &str, weight: u32) -> Criterion {
        Criterion {
            name: name.to_string(),
            description: format!("{name} description"),
            weight,
            scoring_descriptions: (1..=5).map(|n| format!("Level {n}")).collect(),
        }
    }

    fn band(label: &str, min: u32, max: u32) -> PerformanceBand {
        PerformanceBand {
            label: label.to_string(),
            min_percent: min,
            max_percent: max,
        }
    }

    fn valid_bands() -> Vec<PerformanceBand> {
        vec![band("Low", 0, 59), band("Mid", 60, 79), band("High", 80, 100)]
    }

    #[test]
    fn test_valid_rubric_passes() {
        let criteria = vec![criterion("Welcome", 40), criterion("Closing", 60)];
        assert!(validate_rubric("Sales", &criteria, &valid_bands()).is_empty());
    }

    #[test]
    fn test_blank_name_rejected() {
        let criteria = vec![criterion("Welcome", 100)];
        let problems = validate_rubric("  ", &criteria, &valid_bands());
        assert!(problems.iter().any(|p| p.contains("name must not be blank")));
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let criteria = vec![criterion("Welcome", 40), criterion("Closing", 59)];
        let problems = validate_rubric("Sales", &criteria, &valid_bands());
        assert!(problems.iter().any(|p| p.contains("sum to 100, got 99")));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let criteria = vec![criterion("Welcome", 0), criterion("Closing", 100)];
        let problems = validate_rubric("Sales", &criteria, &valid_bands());
        assert!(problems.iter().any(|p| p.contains("at least 1")));
    }

    #[test]
    fn test_empty_criteria_rejected() {
        let problems = validate_rubric("Sales", &[], &valid_bands());
        assert!(problems.iter().any(|p| p.contains("at least one criterion")));
    }

    #[test]
    fn test_duplicate_criterion_names_rejected() {
        let criteria = vec![criterion("Welcome", 50), criterion("welcome", 50)];
        let problems = validate_rubric("Sales", &criteria, &valid_bands());
        assert!(problems.iter().any(|p| p.contains("Duplicate criterion")));
    }

    #[test]
    fn test_wrong_scoring_level_count_rejected() {
        let mut c = criterion("Welcome", 100);
        c.scoring_descriptions.pop();
        let problems = validate_rubric("Sales", &[c], &valid_bands());
        assert!(problems.iter().any(|p| p.contains("exactly 5")));
    }

    #[test]
    fn test_blank_scoring_description_rejected() {
        let mut c = criterion("Welcome", 100);
        c.scoring_descriptions[2] = "   ".to_string();
        let problems = validate_rubric("Sales", &[c], &valid_bands());
        assert!(problems.iter().any(|p| p.contains("blank scoring description")));
    }

    #[test]
    fn test_bands_with_gap_rejected() {
        let bands = vec![band("Low", 0, 59), band("High", 61, 100)];
        let problems = validate_rubric("Sales", &[criterion("W", 100)], &bands);
        assert!(problems.iter().any(|p| p.contains("contiguous")));
    }

    #[test]
    fn test_bands_with_overlap_rejected() {
        let bands = vec![band("Low", 0, 60), band("High", 60, 100)];
        let problems = validate_rubric("Sales", &[criterion("W", 100)], &bands);
        assert!(problems.iter().any(|p| p.contains("contiguous")));
    }

    #[test]
    fn test_bands_not_starting_at_zero_rejected() {
        let bands = vec![band("Low", 5, 59), band("High", 60, 100)];
        let problems = validate_rubric("Sales", &[criterion("W", 100)], &bands);
        assert!(problems.iter().any(|p| p.contains("start at 0%")));
    }

    #[test]
    fn test_bands_not_ending_at_100_rejected() {
        let bands = vec![band("Low", 0, 59), band("High", 60, 99)];
        let problems = validate_rubric("Sales", &[criterion("W", 100)], &bands);
        assert!(problems.iter().any(|p| p.contains("end at 100%")));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let bands = vec![band("Broken", 0, 100), band("Inverted", 90, 80)];
        let problems = validate_rubric("Sales", &[criterion("W", 100)], &bands);
        assert!(problems.iter().any(|p| p.contains("above max_percent")));
    }

    #[test]
    fn test_unsorted_input_accepted_when_tiling() {
        // Bands may arrive in any order; tiling is checked after sorting.
        let bands = vec![band("High", 80, 100), band("Low", 0, 59), band("Mid", 60, 79)];
        assert!(validate_rubric("Sales", &[criterion("W", 100)], &bands).is_empty());
    }

    #[test]
    fn test_single_full_range_band_accepted() {
        let bands = vec![band("All", 0, 100)];
        assert!(validate_rubric("Sales", &[criterion("W", 100)], &bands).is_empty());
    }
}
