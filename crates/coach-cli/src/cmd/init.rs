use anyhow::Context;
use coach_core::{config::Config, io, paths, state::State};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "studio".to_string());

    println!("Initializing coach in: {}", root.display());

    for dir in [paths::COACH_DIR, paths::RECORDS_DIR, paths::SESSIONS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    if !paths::config_path(root).exists() {
        Config::new(&project_name)
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    if !paths::state_path(root).exists() {
        State::new(&project_name)
            .save(root)
            .context("failed to write state.yaml")?;
        println!("  created: {}", paths::STATE_FILE);
    } else {
        println!("  exists:  {}", paths::STATE_FILE);
    }

    println!("\nNext: coach new --category fitness");
    Ok(())
}
