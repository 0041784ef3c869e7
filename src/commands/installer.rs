//! Installer command - stage the installer for an already built collection.

use anyhow::{bail, Context, Result};

use kc_noshim::pipeline;
use kc_noshim::preflight;
use kc_noshim::process::CommandRunner;
use kc_noshim::KcConfig;

/// Execute the installer command.
pub fn cmd_installer(runner: &impl CommandRunner, config: &KcConfig) -> Result<()> {
    if !config.kc_output.exists() {
        bail!(
            "{} not found. Run 'kc-noshim build' first.",
            config.kc_output.display()
        );
    }

    preflight::run_preflight_or_fail(runner, config).context("Preflight failed")?;

    let (uuid, installer) =
        pipeline::stage_installer(runner, config).context("Staging installer failed")?;
    println!("Installer:     {}", installer.display());
    println!("System volume: {}", uuid);
    Ok(())
}
