//! Evaluation domain — scoring a tasting-room sales conversation against a
//! rubric via the LLM, with repair and a deterministic fallback.

pub mod cleanup;
pub mod engine;
pub mod fallback;
pub mod handlers;
pub mod prompts;
pub mod repair;
pub mod scoring;

use serde::{Deserialize, Serialize};

/// The fixed-shape record the evaluation LLM must produce: one score per
/// rubric criterion plus exactly three strengths, improvement areas, and
/// recommendations. Malformed model output is coerced into this shape by
/// `repair::coerce_evaluation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationData {
    pub scores: Vec<CriterionScore>,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: String,
    /// 1 through 5, per the criterion's scoring descriptions.
    pub score: u8,
    pub justification: String,
}
