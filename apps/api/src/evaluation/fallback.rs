//! Keyword fallback evaluator — a deterministic, pure-Rust scorer used when
//! the LLM call fails outright. Shape-compatible with the model's output so
//! downstream scoring and storage are unaffected.

use std::collections::BTreeSet;

use crate::evaluation::{CriterionScore, EvaluationData};
use crate::rubric::Criterion;

pub const FALLBACK_PROVIDER: &str = "fallback";

/// Words too generic to signal a criterion in this domain.
const STOPWORDS: &[&str] = &[
    "about", "asks", "been", "before", "being", "consistently", "each", "every", "from",
    "guest", "guests", "have", "keeps", "makes", "naturally", "never", "suited", "that",
    "their", "them", "they", "this", "through", "tone", "uses", "when", "where", "with",
    "without",
];

/// Matches hit when `2 + hits` (capped at 5) becomes the criterion score.
const BASE_SCORE: u8 = 2;
const MAX_COUNTED_HITS: usize = 3;

/// Produces a complete EvaluationData from keyword matches alone.
///
/// Each criterion's keywords are the distinctive words of its name and
/// description; a criterion scores 2 plus one point per matched keyword
/// (capped at 5). An empty transcript scores 1 everywhere.
pub fn fallback_evaluation(transcript: &str, criteria: &[Criterion]) -> EvaluationData {
    let transcript_lower = transcript.to_lowercase();
    let transcript_empty = transcript_lower.trim().is_empty();

    let mut scores = Vec::with_capacity(criteria.len());
    for criterion in criteria {
        let keywords = criterion_keywords(criterion);
        let hits: Vec<&str> = keywords
            .iter()
            .filter(|k| transcript_lower.contains(k.as_str()))
            .map(|k| k.as_str())
            .collect();

        let score = if transcript_empty {
            1
        } else {
            BASE_SCORE + hits.len().min(MAX_COUNTED_HITS) as u8
        };

        let justification = if hits.is_empty() {
            format!(
                "Keyword scan found no mention of '{}' topics in the transcript.",
                criterion.name
            )
        } else {
            format!("Keyword scan matched: {}.", hits.join(", "))
        };

        scores.push(CriterionScore {
            criterion: criterion.name.clone(),
            score,
            justification,
        });
    }

    // Rank criteria by score (stable on rubric order) to pick the three
    // best as strengths and the three worst as improvement targets.
    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].score.cmp(&scores[a].score).then(a.cmp(&b)));

    let mut strengths: Vec<String> = ranked
        .iter()
        .take(3)
        .map(|&i| {
            format!(
                "Relative strength: {} ({}/5 by keyword scan).",
                criteria[i].name, scores[i].score
            )
        })
        .collect();

    let worst: Vec<usize> = ranked.iter().rev().take(3).copied().collect();
    let mut improvement_areas: Vec<String> = worst
        .iter()
        .map(|&i| {
            format!(
                "Needs attention: {} ({}/5 by keyword scan).",
                criteria[i].name, scores[i].score
            )
        })
        .collect();

    let mut recommendations: Vec<String> = worst
        .iter()
        .map(|&i| {
            format!(
                "Coach on '{}': {}",
                criteria[i].name, criteria[i].description
            )
        })
        .collect();

    pad_to_three(&mut strengths, "strength");
    pad_to_three(&mut improvement_areas, "improvement area");
    pad_to_three(&mut recommendations, "recommendation");

    EvaluationData {
        scores,
        strengths,
        improvement_areas,
        recommendations,
    }
}

fn criterion_keywords(criterion: &Criterion) -> BTreeSet<String> {
    format!("{} {}", criterion.name, criterion.description)
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| t.len() >= 4 && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

fn pad_to_three(items: &mut Vec<String>, noun: &str) {
    while items.len() < 3 {
        items.push(format!(
            "Automated fallback could not identify another {noun}."
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::defaults::default_criteria;

    const TRANSCRIPT: &str = "Host: Welcome in! I'm Dana. What's the occasion today?\n\
        Guest: Our anniversary, we love a bold red.\n\
        Host: Congratulations! Our estate cabernet has a great story, the \
        winemaker picked that block the morning of the first frost. Would you \
        like to join our wine club? Members get this bottle at twenty percent off.";

    #[test]
    fn test_output_shape_is_complete() {
        let criteria = default_criteria();
        let data = fallback_evaluation(TRANSCRIPT, &criteria);
        assert_eq!(data.scores.len(), criteria.len());
        assert_eq!(data.strengths.len(), 3);
        assert_eq!(data.improvement_areas.len(), 3);
        assert_eq!(data.recommendations.len(), 3);
    }

    #[test]
    fn test_scores_bounded_1_to_5() {
        let data = fallback_evaluation(TRANSCRIPT, &default_criteria());
        assert!(data.scores.iter().all(|s| (1..=5).contains(&s.score)));
    }

    #[test]
    fn test_deterministic() {
        let criteria = default_criteria();
        let a = fallback_evaluation(TRANSCRIPT, &criteria);
        let b = fallback_evaluation(TRANSCRIPT, &criteria);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_transcript_scores_1_everywhere() {
        let data = fallback_evaluation("   ", &default_criteria());
        assert!(data.scores.iter().all(|s| s.score == 1));
    }

    #[test]
    fn test_matched_keywords_raise_score() {
        let criteria = default_criteria();
        let data = fallback_evaluation(TRANSCRIPT, &criteria);
        // "Wine Club Invitation" keywords (club, invitation/members, benefits)
        // appear in the transcript; its score must clear the base.
        let club = data
            .scores
            .iter()
            .find(|s| s.criterion == "Wine Club Invitation")
            .unwrap();
        assert!(club.score > BASE_SCORE, "score was {}", club.score);
    }

    #[test]
    fn test_unmatched_criterion_stays_at_base() {
        let criteria = default_criteria();
        let data = fallback_evaluation("Hello there.", &criteria);
        let objections = data
            .scores
            .iter()
            .find(|s| s.criterion == "Objection Handling")
            .unwrap();
        assert_eq!(objections.score, BASE_SCORE);
        assert!(objections.justification.contains("no mention"));
    }

    #[test]
    fn test_fewer_than_three_criteria_still_fills_lists() {
        let criteria = vec![Criterion {
            name: "Only One".to_string(),
            description: "Single criterion".to_string(),
            weight: 100,
            scoring_descriptions: (1..=5).map(|n| format!("Level {n}")).collect(),
        }];
        let data = fallback_evaluation(TRANSCRIPT, &criteria);
        assert_eq!(data.strengths.len(), 3);
        assert_eq!(data.improvement_areas.len(), 3);
        assert_eq!(data.recommendations.len(), 3);
    }
}
