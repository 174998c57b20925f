//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Ask before dropping the features a step selected.
/// Always true when `skip` is set (non-interactive runs).
pub fn confirm_drop_features(features: &[String], step_name: &str, skip: bool) -> Result<bool> {
    if skip || features.is_empty() {
        return Ok(true);
    }
    confirm_step(&format!(
        "Drop {} feature(s) flagged by {}?",
        features.len(),
        step_name
    ))
}
