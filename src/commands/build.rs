//! Build command - rebuild the collection without staging an installer.

use anyhow::{Context, Result};

use kc_noshim::pipeline;
use kc_noshim::preflight;
use kc_noshim::process::CommandRunner;
use kc_noshim::KcConfig;

/// Execute the build command.
pub fn cmd_build(runner: &impl CommandRunner, config: &KcConfig) -> Result<()> {
    preflight::run_preflight_or_fail(runner, config).context("Preflight failed")?;
    let kc =
        pipeline::build_collection(runner, config).context("Kernel collection rebuild failed")?;
    println!("Kernel collection: {}", kc.display());
    Ok(())
}
