//! Transcript cleanup — asks the LLM to normalise a raw transcript, with a
//! local best-effort pass when the call fails.

use tracing::warn;

use crate::evaluation::prompts::{CLEANUP_PROMPT_TEMPLATE, CLEANUP_SYSTEM};
use crate::llm_client::repair::strip_json_fences;
use crate::llm_client::LlmProvider;

pub struct CleanupOutcome {
    pub cleaned_transcript: String,
    /// "claude" / "gemini", or "fallback" when the local pass was used.
    pub provider: String,
}

pub async fn cleanup_transcript(llm: &dyn LlmProvider, transcript: &str) -> CleanupOutcome {
    let prompt = CLEANUP_PROMPT_TEMPLATE.replace("{transcript}", transcript);

    match llm.complete(&prompt, CLEANUP_SYSTEM).await {
        Ok(text) => {
            let cleaned = strip_json_fences(&text).trim().to_string();
            if cleaned.is_empty() {
                warn!("Cleanup LLM returned empty text; using local normalisation");
                CleanupOutcome {
                    cleaned_transcript: local_normalize(transcript),
                    provider: "fallback".to_string(),
                }
            } else {
                CleanupOutcome {
                    cleaned_transcript: cleaned,
                    provider: llm.name().to_string(),
                }
            }
        }
        Err(e) => {
            warn!("Cleanup LLM call failed ({e}); using local normalisation");
            CleanupOutcome {
                cleaned_transcript: local_normalize(transcript),
                provider: "fallback".to_string(),
            }
        }
    }
}

/// Local best-effort pass: drops bracketed annotations like [inaudible],
/// collapses runs of spaces and tabs, trims lines, and collapses blank-line
/// runs. Wording is never altered.
pub fn local_normalize(transcript: &str) -> String {
    let lines: Vec<String> = transcript
        .lines()
        .map(|line| collapse_spaces(&strip_bracketed(line)).trim().to_string())
        .collect();

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut prev_blank = false;
    for line in &lines {
        let blank = line.is_empty();
        if blank && prev_blank {
            continue;
        }
        out.push(line);
        prev_blank = blank;
    }

    out.join("\n").trim().to_string()
}

fn strip_bracketed(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut depth = 0u32;
    for c in line.chars() {
        match c {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            c if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut prev_space = false;
    for c in line.chars() {
        if c == ' ' || c == '\t' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}
