//! Prompt sent to the suggestion API.

use crate::model::DailySummary;

const OUTFIT_TEMPLATE: &str = include_str!("../prompts/outfit.txt");
const SUMMARY_SLOT: &str = "{summary}";

/// Fill the outfit template with the rendered summary.
pub fn outfit_prompt(summary: &DailySummary) -> String {
    OUTFIT_TEMPLATE.replacen(SUMMARY_SLOT, summary.to_string().trim_end(), 1)
}
