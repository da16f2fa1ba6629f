// All LLM prompt constants for the Evaluation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for conversation evaluation. Enforces JSON-only output.
pub const EVALUATION_SYSTEM: &str =
    "You are an expert tasting-room sales coach evaluating a transcribed \
    conversation between a winery host and their guests. \
    Score strictly against the rubric you are given. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Evaluation prompt template.
/// Replace: {criteria_block}, {criterion_count}, {transcript}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate the following tasting-room sales conversation against this rubric.

RUBRIC CRITERIA (score each from 1 to 5 using its level descriptions):
{criteria_block}

Return a JSON object with this EXACT schema (no extra fields):
{
  "scores": [
    {"criterion": "Welcome & Rapport", "score": 4, "justification": "Specific moment from the transcript"}
  ],
  "strengths": ["...", "...", "..."],
  "improvement_areas": ["...", "...", "..."],
  "recommendations": ["...", "...", "..."]
}

HARD RULES:
1. "scores" must contain exactly {criterion_count} entries, one per rubric criterion, in the order listed above, using the exact criterion names
2. every "score" is an integer from 1 to 5 chosen against that criterion's level descriptions
3. "strengths", "improvement_areas", and "recommendations" must each contain exactly 3 items
4. every justification must reference a specific moment or quote from the transcript
5. judge only what is in the transcript; do not invent behavior that is not there

TRANSCRIPT:
{transcript}"#;

/// System prompt for transcript cleanup. The model returns plain text.
pub const CLEANUP_SYSTEM: &str =
    "You are a careful transcript editor for winery tasting-room recordings. \
    Return ONLY the cleaned transcript text. \
    Do NOT add commentary, headers, or markdown fences. \
    NEVER summarize or paraphrase; keep the speakers' wording.";

/// Cleanup prompt template. Replace: {transcript}
pub const CLEANUP_PROMPT_TEMPLATE: &str = r#"Clean up the following raw tasting-room conversation transcript:
- label speakers consistently as "Host:" and "Guest:" where identifiable
- remove filler words (um, uh, you know) and transcription artifacts
- keep the original wording and order of everything else
- preserve line breaks between speaker turns

TRANSCRIPT:
{transcript}"#;
