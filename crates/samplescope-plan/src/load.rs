use std::path::Path;

use crate::errors::{PlanError, Result};
use crate::model::SweepPlan;

/// Parse a plan from a JSON document.
pub fn parse_plan_json(contents: &str) -> Result<SweepPlan> {
    Ok(serde_json::from_str(contents)?)
}

/// Parse a plan from a TOML document.
pub fn parse_plan_toml(contents: &str) -> Result<SweepPlan> {
    Ok(toml::from_str(contents)?)
}

/// Load a plan from disk, picking the format from the file extension.
pub fn load_plan(path: &Path) -> Result<SweepPlan> {
    let contents = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => parse_plan_json(&contents),
        Some("toml") => parse_plan_toml(&contents),
        _ => Err(PlanError::UnsupportedFormat(path.display().to_string())),
    }
}
