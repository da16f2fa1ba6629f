//! Coerces whatever the model returned into a complete `EvaluationData`:
//! text-level cleanup first, then field-by-field defaulting so a partial or
//! malformed response still yields a usable evaluation.

use serde_json::Value;

use crate::evaluation::{CriterionScore, EvaluationData};
use crate::llm_client::repair::{extract_json_object, strip_json_fences, strip_trailing_commas};
use crate::rubric::Criterion;

/// strengths / improvement_areas / recommendations are each exactly this long.
pub const LIST_LEN: usize = 3;

/// Score substituted when an entry is missing or non-numeric.
const DEFAULT_SCORE: u8 = 3;

#[derive(Debug)]
pub struct RepairedEvaluation {
    pub data: EvaluationData,
    /// True when any defaulting, padding, truncation, clamping, or
    /// structural extraction was required. Fence stripping alone does not
    /// count; models wrap JSON in fences routinely.
    pub repaired: bool,
}

pub fn coerce_evaluation(raw: &str, criteria: &[Criterion]) -> RepairedEvaluation {
    let mut repaired = false;

    let value = parse_model_json(raw, &mut repaired);

    let scores = coerce_scores(value.get("scores"), criteria, &mut repaired);
    let strengths = coerce_list(value.get("strengths"), "strength", &mut repaired);
    let improvement_areas = coerce_list(
        value.get("improvement_areas"),
        "improvement area",
        &mut repaired,
    );
    let recommendations = coerce_list(value.get("recommendations"), "recommendation", &mut repaired);

    RepairedEvaluation {
        data: EvaluationData {
            scores,
            strengths,
            improvement_areas,
            recommendations,
        },
        repaired,
    }
}

/// Parses the response text into a Value, escalating through the text-level
/// repairs. Returns Null (and flags repair) when nothing parseable remains.
fn parse_model_json(raw: &str, repaired: &mut bool) -> Value {
    let stripped = strip_json_fences(raw);
    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        return value;
    }

    *repaired = true;

    if let Some(extracted) = extract_json_object(stripped) {
        if let Ok(value) = serde_json::from_str::<Value>(extracted) {
            return value;
        }
        let decommaed = strip_trailing_commas(extracted);
        if let Ok(value) = serde_json::from_str::<Value>(&decommaed) {
            return value;
        }
    }

    Value::Null
}

/// One entry per rubric criterion, in rubric order. Criterion names come
/// from the rubric, so a model that shuffled or mislabelled names still
/// produces a record aligned with the rubric.
fn coerce_scores(
    value: Option<&Value>,
    criteria: &[Criterion],
    repaired: &mut bool,
) -> Vec<CriterionScore> {
    let empty = Vec::new();
    let entries = match value.and_then(|v| v.as_array()) {
        Some(arr) => arr,
        None => {
            *repaired = true;
            &empty
        }
    };

    if entries.len() > criteria.len() {
        *repaired = true; // extras are dropped
    }

    let mut scores = Vec::with_capacity(criteria.len());
    for (i, criterion) in criteria.iter().enumerate() {
        let entry = entries.get(i);
        if entry.is_none() {
            *repaired = true;
        }

        let score = match entry.and_then(|e| e.get("score")).and_then(numeric_score) {
            Some(n) if (1..=5).contains(&n) => n as u8,
            Some(n) => {
                *repaired = true;
                n.clamp(1, 5) as u8
            }
            None => {
                *repaired = true;
                DEFAULT_SCORE
            }
        };

        let justification = match entry
            .and_then(|e| e.get("justification"))
            .and_then(|v| v.as_str())
            .map(str::trim)
        {
            Some(j) if !j.is_empty() => j.to_string(),
            _ => {
                *repaired = true;
                "No justification provided by the model.".to_string()
            }
        };

        scores.push(CriterionScore {
            criterion: criterion.name.clone(),
            score,
            justification,
        });
    }
    scores
}

/// Accepts integers, floats, and numeric strings.
fn numeric_score(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
}

/// Pads or truncates a free-text list to exactly LIST_LEN entries.
fn coerce_list(value: Option<&Value>, noun: &str, repaired: &mut bool) -> Vec<String> {
    let mut items: Vec<String> = value
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if items.len() != LIST_LEN {
        *repaired = true;
    }
    items.truncate(LIST_LEN);
    while items.len() < LIST_LEN {
        items.push(format!("No {noun} identified by the model."));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(n: usize) -> Vec<Criterion> {
        (0..n)
            .map(|i| Criterion {
                name: format!("Criterion {}", i + 1),
                description: String::new(),
                weight: 10,
                scoring_descriptions: (1..=5).map(|l| format!("Level {l}")).collect(),
            })
            .collect()
    }

    fn well_formed(n: usize) -> String {
        let scores: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"criterion": "Criterion {}", "score": 4, "justification": "Quoted the guest"}}"#,
                    i + 1
                )
            })
            .collect();
        format!(
            r#"{{"scores": [{}], "strengths": ["a", "b", "c"], "improvement_areas": ["d", "e", "f"], "recommendations": ["g", "h", "i"]}}"#,
            scores.join(",")
        )
    }

    #[test]
    fn test_clean_response_is_not_marked_repaired() {
        let outcome = coerce_evaluation(&well_formed(2), &criteria(2));
        assert!(!outcome.repaired);
        assert_eq!(outcome.data.scores.len(), 2);
        assert_eq!(outcome.data.scores[0].score, 4);
        assert_eq!(outcome.data.strengths, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fenced_response_is_not_marked_repaired() {
        let fenced = format!("```json\n{}\n```", well_formed(1));
        let outcome = coerce_evaluation(&fenced, &criteria(1));
        assert!(!outcome.repaired);
    }

    #[test]
    fn test_prose_around_json_is_repaired_but_parsed() {
        let wrapped = format!("Here is your evaluation:\n{}\nLet me know!", well_formed(1));
        let outcome = coerce_evaluation(&wrapped, &criteria(1));
        assert!(outcome.repaired);
        assert_eq!(outcome.data.scores[0].score, 4);
    }

    #[test]
    fn test_trailing_commas_are_recovered() {
        let raw = r#"{"scores": [{"criterion": "Criterion 1", "score": 2, "justification": "x",},], "strengths": ["a", "b", "c",], "improvement_areas": ["d", "e", "f"], "recommendations": ["g", "h", "i"]}"#;
        let outcome = coerce_evaluation(raw, &criteria(1));
        assert!(outcome.repaired);
        assert_eq!(outcome.data.scores[0].score, 2);
    }

    #[test]
    fn test_short_scores_padded_to_criterion_count() {
        let raw = r#"{"scores": [{"criterion": "Criterion 1", "score": 5, "justification": "x"}], "strengths": ["a", "b", "c"], "improvement_areas": ["d", "e", "f"], "recommendations": ["g", "h", "i"]}"#;
        let outcome = coerce_evaluation(raw, &criteria(3));
        assert!(outcome.repaired);
        assert_eq!(outcome.data.scores.len(), 3);
        assert_eq!(outcome.data.scores[0].score, 5);
        assert_eq!(outcome.data.scores[1].score, 3);
        assert_eq!(outcome.data.scores[2].criterion, "Criterion 3");
    }

    #[test]
    fn test_extra_scores_truncated() {
        let outcome = coerce_evaluation(&well_formed(5), &criteria(2));
        assert!(outcome.repaired);
        assert_eq!(outcome.data.scores.len(), 2);
    }

    #[test]
    fn test_out_of_range_score_clamped() {
        let raw = r#"{"scores": [{"criterion": "Criterion 1", "score": 11, "justification": "x"}], "strengths": ["a", "b", "c"], "improvement_areas": ["d", "e", "f"], "recommendations": ["g", "h", "i"]}"#;
        let outcome = coerce_evaluation(raw, &criteria(1));
        assert!(outcome.repaired);
        assert_eq!(outcome.data.scores[0].score, 5);
    }

    #[test]
    fn test_non_numeric_score_defaults_to_3() {
        let raw = r#"{"scores": [{"criterion": "Criterion 1", "score": "great", "justification": "x"}], "strengths": ["a", "b", "c"], "improvement_areas": ["d", "e", "f"], "recommendations": ["g", "h", "i"]}"#;
        let outcome = coerce_evaluation(raw, &criteria(1));
        assert!(outcome.repaired);
        assert_eq!(outcome.data.scores[0].score, 3);
    }

    #[test]
    fn test_numeric_string_score_accepted() {
        let raw = r#"{"scores": [{"criterion": "Criterion 1", "score": "4", "justification": "x"}], "strengths": ["a", "b", "c"], "improvement_areas": ["d", "e", "f"], "recommendations": ["g", "h", "i"]}"#;
        let outcome = coerce_evaluation(raw, &criteria(1));
        assert_eq!(outcome.data.scores[0].score, 4);
    }

    #[test]
    fn test_criterion_names_come_from_rubric() {
        let raw = r#"{"scores": [{"criterion": "Something Else", "score": 4, "justification": "x"}], "strengths": ["a", "b", "c"], "improvement_areas": ["d", "e", "f"], "recommendations": ["g", "h", "i"]}"#;
        let outcome = coerce_evaluation(raw, &criteria(1));
        assert_eq!(outcome.data.scores[0].criterion, "Criterion 1");
    }

    #[test]
    fn test_short_list_padded_with_placeholders() {
        let raw = r#"{"scores": [], "strengths": ["only one"], "improvement_areas": [], "recommendations": ["g", "h", "i", "j"]}"#;
        let outcome = coerce_evaluation(raw, &criteria(1));
        assert!(outcome.repaired);
        assert_eq!(outcome.data.strengths.len(), 3);
        assert_eq!(outcome.data.strengths[0], "only one");
        assert!(outcome.data.strengths[1].contains("No strength"));
        assert_eq!(outcome.data.recommendations.len(), 3);
        assert_eq!(outcome.data.recommendations[2], "i");
    }

    #[test]
    fn test_garbage_text_yields_fully_defaulted_record() {
        let outcome = coerce_evaluation("I'm sorry, I cannot evaluate this.", &criteria(2));
        assert!(outcome.repaired);
        assert_eq!(outcome.data.scores.len(), 2);
        assert!(outcome.data.scores.iter().all(|s| s.score == 3));
        assert_eq!(outcome.data.strengths.len(), 3);
        assert_eq!(outcome.data.improvement_areas.len(), 3);
        assert_eq!(outcome.data.recommendations.len(), 3);
    }

    #[test]
    fn test_blank_justification_defaulted() {
        let raw = r#"{"scores": [{"criterion": "Criterion 1", "score": 4, "justification": "  "}], "strengths": ["a", "b", "c"], "improvement_areas": ["d", "e", "f"], "recommendations": ["g", "h", "i"]}"#;
        let outcome = coerce_evaluation(raw, &criteria(1));
        assert!(outcome.repaired);
        assert!(outcome.data.scores[0].justification.contains("No justification"));
    }
}
