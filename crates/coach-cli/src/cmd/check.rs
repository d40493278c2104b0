use crate::output::print_json;
use anyhow::Context;
use coach_core::config::{Config, WarnLevel};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();
    let errors = warnings
        .iter()
        .filter(|w| w.level == WarnLevel::Error)
        .count();

    if json {
        print_json(&serde_json::json!({
            "ok": errors == 0,
            "warnings": warnings,
        }))?;
    } else if warnings.is_empty() {
        println!("config ok");
    } else {
        for w in &warnings {
            let label = match w.level {
                WarnLevel::Error => "error",
                WarnLevel::Warning => "warning",
            };
            println!("{label}: {}", w.message);
        }
    }

    if errors > 0 {
        anyhow::bail!("config has {errors} error(s)");
    }
    Ok(())
}
