//! Preflight command - runs preflight checks.

use anyhow::{bail, Result};

use kc_noshim::preflight;
use kc_noshim::process::CommandRunner;
use kc_noshim::KcConfig;

/// Execute the preflight command.
pub fn cmd_preflight(runner: &impl CommandRunner, config: &KcConfig, strict: bool) -> Result<()> {
    let report = preflight::run_preflight(runner, config);
    report.print();

    if !report.all_passed() {
        if strict {
            bail!("Preflight failed: {} check(s) failed.", report.fail_count());
        }
        println!("Some checks failed. Use --strict to exit non-zero.");
    }
    Ok(())
}
