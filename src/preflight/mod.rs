//! Preflight checks for a kernel collection rebuild.
//!
//! Validates host tools and system paths before anything is built.
//! Run with `kc-noshim preflight` to check everything is ready.

mod host;
mod host_tools;
mod types;

use log::{info, warn};

use crate::config::KcConfig;
use crate::error::{Error, Result};
use crate::process::CommandRunner;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run all preflight checks.
pub fn run_preflight(runner: &impl CommandRunner, config: &KcConfig) -> PreflightReport {
    let mut checks = Vec::new();

    info!("Checking host tools...");
    checks.extend(host_tools::check_host_tools(runner));

    info!("Checking system paths...");
    checks.extend(host::check_system_paths(runner, config));

    PreflightReport { checks }
}

/// Run preflight and fail on the first missing required tool.
///
/// Tools are checked before anything is executed, so a missing tool aborts
/// the run without running any command.
pub fn run_preflight_or_fail(runner: &impl CommandRunner, config: &KcConfig) -> Result<()> {
    info!("Checking host tools...");
    let mut report = PreflightReport {
        checks: host_tools::check_host_tools(runner),
    };

    if let Some(missing) = report.failures().next() {
        let tool = missing.name.clone();
        report.print();
        return Err(Error::ToolNotFound { tool });
    }

    info!("Checking system paths...");
    let paths = host::check_system_paths(runner, config);
    report.checks.extend(paths);
    for check in report.warnings() {
        let details = check.details.as_deref().unwrap_or_default();
        warn!("{}: {}", check.name, details);
    }

    info!(
        "All preflight checks passed ({} warning(s))",
        report.warn_count()
    );
    Ok(())
}
