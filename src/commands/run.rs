//! Run command - the full rebuild.

use anyhow::{Context, Result};

use kc_noshim::pipeline;
use kc_noshim::preflight;
use kc_noshim::process::CommandRunner;
use kc_noshim::KcConfig;

/// Execute the run command.
pub fn cmd_run(runner: &impl CommandRunner, config: &KcConfig) -> Result<()> {
    preflight::run_preflight_or_fail(runner, config).context("Preflight failed")?;

    let out = pipeline::run(runner, config).context("Kernel collection rebuild failed")?;

    println!();
    println!("Kernel collection: {}", out.kc.display());
    println!("Installer:         {}", out.installer.display());
    println!("System volume:     {}", out.volume_uuid);
    println!();
    println!("Run the installer to make the new collection the boot collection:");
    println!("  {}", out.installer.display());
    Ok(())
}
