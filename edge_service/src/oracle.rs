use pathsim::prelude::YearlyModifier;

use crate::errors::{Result, ServiceError};

/// Turns a free-text economic scenario into per-year modifiers. Concrete
/// implementations talk to an external model; the service only depends on
/// this trait.
pub trait ScenarioOracle: Send + Sync {
    fn analyze(&self, scenario: &str) -> Result<Vec<YearlyModifier>>;
}

/// Instruction text sent to a language model oracle.
pub fn scenario_prompt(scenario: &str, years: usize, base_drift: f64, base_volatility: f64) -> String {
    format!(
        "You are an economic scenario simulator.\n\
         Analyze the following scenario and predict its economic impact for the next {years} years.\n\
         Scenario: \"{scenario}\"\n\n\
         Output ONLY a JSON array of objects with fields: \"year\" (1 to {years}), \
         \"drift_mod\" (float, additive change to annual growth, e.g. -0.02 for -2%), \
         \"volatility_mod\" (float, additive change to volatility, e.g. 0.10 for +10%).\n\
         Base drift is {base_drift}, base volatility is {base_volatility}.\n\
         Example: [{{\"year\":1,\"drift_mod\":-0.10,\"volatility_mod\":0.20}}]\n\
         Do not include markdown formatting or explanations.",
    )
}

/// Decodes an oracle reply, tolerating surrounding whitespace and Markdown
/// code fences.
pub fn parse_oracle_reply(raw: &str) -> Result<Vec<YearlyModifier>> {
    let mut text = raw.trim();
    text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text = text.strip_suffix("```").unwrap_or(text).trim();

    serde_json::from_str(text)
        .map_err(|e| ServiceError::Oracle(format!("unparseable reply ({}): {}", e, raw)))
}
