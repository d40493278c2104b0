use anyhow::Context;
use coach_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    Config::load(root).context("failed to load config")?;
    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    rt.block_on(coach_server::serve(root.to_path_buf(), port))
}
