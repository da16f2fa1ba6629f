//! The built-in tasting-room sales rubric, seeded on first boot.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::rubric::{Criterion, PerformanceBand};

pub const DEFAULT_RUBRIC_NAME: &str = "Tasting Room Sales Conversation";
pub const DEFAULT_RUBRIC_DESCRIPTION: &str =
    "Scores a wine-tasting sales conversation across the full guest journey, \
     from welcome through wine club invitation and close.";

/// (name, description, weight, [score 1..5 descriptions])
/// Weights sum to 100.
const DEFAULT_CRITERIA: &[(&str, &str, u32, [&str; 5])] = &[
    (
        "Welcome & Rapport",
        "Greets the guest warmly, uses names, and sets a relaxed tone for the tasting.",
        10,
        [
            "No greeting; guest is left waiting with no acknowledgement",
            "Perfunctory greeting with no attempt at personal connection",
            "Friendly greeting but little follow-through on rapport",
            "Warm greeting, uses the guest's name, light personal conversation",
            "Immediate warm welcome, names remembered, genuine rapport sustained throughout",
        ],
    ),
    (
        "Guest Discovery",
        "Asks about taste preferences, the occasion, and past wine experience before pouring.",
        10,
        [
            "No discovery questions at all",
            "A single generic question with the answer ignored",
            "A few questions, but pours are not adapted to the answers",
            "Good open questions and the flight is adjusted to the guest",
            "Thorough, natural discovery that visibly shapes the whole visit",
        ],
    ),
    (
        "Wine Knowledge & Storytelling",
        "Presents each wine accurately and ties it to vineyard, vintage, and winemaker stories.",
        15,
        [
            "Wrong or no information about the wines poured",
            "Reads the tech sheet verbatim with no story",
            "Accurate basics but generic delivery",
            "Accurate, confident notes with at least one memorable story",
            "Expert knowledge woven into stories tailored to this guest's interests",
        ],
    ),
    (
        "Tasting Guidance",
        "Coaches the guest through look, smell, and taste without being condescending.",
        10,
        [
            "Pours with no guidance at all",
            "Rushed mechanical instructions",
            "Basic guidance for some pours but inconsistent",
            "Clear, friendly guidance for each pour",
            "Adapts guidance to the guest's experience level and invites dialogue",
        ],
    ),
    (
        "Objection Handling",
        "Responds to price, style, or shipping concerns with empathy and alternatives.",
        10,
        [
            "Ignores or argues with objections",
            "Acknowledges objections but offers nothing",
            "Offers a single canned response",
            "Listens, empathizes, and offers a relevant alternative",
            "Turns objections into opportunities without pressure",
        ],
    ),
    (
        "Wine Club Invitation",
        "Introduces the wine club naturally, explains benefits, and makes a clear invitation.",
        15,
        [
            "Never mentions the club",
            "Mentions the club in passing with no benefits",
            "Explains benefits but never actually invites",
            "Clear invitation with benefits tied to the guest's preferences",
            "Compelling, personalized invitation with a concrete next step",
        ],
    ),
    (
        "Add-On & Upsell",
        "Suggests library wines, magnums, or merchandise suited to the guest.",
        10,
        [
            "No suggestions beyond the flight",
            "Generic 'anything else?' only",
            "Suggests an add-on unrelated to guest interest",
            "Relevant add-on suggestion tied to a wine the guest enjoyed",
            "Multiple tailored suggestions that feel like service, not selling",
        ],
    ),
    (
        "Closing the Sale",
        "Asks for the purchase confidently and makes checkout effortless.",
        10,
        [
            "Never asks for a sale",
            "Waits passively for the guest to offer",
            "Asks once, tentatively, and drops it",
            "Confident, natural ask referencing favorite pours",
            "Assumptive, graceful close with options and effortless checkout",
        ],
    ),
    (
        "Follow-Up Commitment",
        "Captures contact details and commits to a concrete follow-up.",
        5,
        [
            "No contact capture or follow-up mention",
            "Vague 'come back soon' with nothing captured",
            "Captures email but promises nothing",
            "Captures contact details and names a follow-up reason",
            "Specific follow-up commitment with date and personal hook",
        ],
    ),
    (
        "Brand Ambassadorship",
        "Represents the winery's story and values consistently and enthusiastically.",
        5,
        [
            "Disparages the winery or competitors",
            "Neutral, interchangeable service with no brand voice",
            "Mentions the winery story once",
            "Consistent, positive brand voice throughout",
            "Infectious enthusiasm that makes the guest an advocate",
        ],
    ),
];

/// (label, min_percent, max_percent) — tiles 0–100.
const DEFAULT_BANDS: &[(&str, u32, u32)] = &[
    ("Needs Improvement", 0, 59),
    ("Developing", 60, 69),
    ("Proficient", 70, 79),
    ("Advanced", 80, 89),
    ("Exceptional", 90, 100),
];

pub fn default_criteria() -> Vec<Criterion> {
    DEFAULT_CRITERIA
        .iter()
        .map(|(name, description, weight, levels)| Criterion {
            name: name.to_string(),
            description: description.to_string(),
            weight: *weight,
            scoring_descriptions: levels.iter().map(|l| l.to_string()).collect(),
        })
        .collect()
}

pub fn default_bands() -> Vec<PerformanceBand> {
    DEFAULT_BANDS
        .iter()
        .map(|(label, min, max)| PerformanceBand {
            label: label.to_string(),
            min_percent: *min,
            max_percent: *max,
        })
        .collect()
}

/// Inserts the built-in rubric as the default if the table is empty.
/// Safe to call on every boot.
pub async fn seed_default_rubric(pool: &PgPool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rubrics")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let criteria = serde_json::to_value(default_criteria())?;
    let bands = serde_json::to_value(default_bands())?;

    sqlx::query(
        r#"
        INSERT INTO rubrics (id, name, description, criteria, bands, is_default, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, NOW(), NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(DEFAULT_RUBRIC_NAME)
    .bind(DEFAULT_RUBRIC_DESCRIPTION)
    .bind(criteria)
    .bind(bands)
    .execute(pool)
    .await?;

    info!("Seeded default rubric '{DEFAULT_RUBRIC_NAME}'");
    Ok(())
}
