//! System path checks (boot collection, kernel binary).

use crate::collection;
use crate::config::KcConfig;
use crate::process::CommandRunner;

use super::types::CheckResult;

/// Check the paths the rebuild reads from.
///
/// These only warn: `kmutil` is the authority on whether it can use them.
pub fn check_system_paths(runner: &impl CommandRunner, config: &KcConfig) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if config.boot_kc.exists() {
        results.push(CheckResult::pass_with(
            "Boot KC",
            &config.boot_kc.display().to_string(),
        ));
    } else {
        results.push(CheckResult::warn(
            "Boot KC",
            &format!("{} not found", config.boot_kc.display()),
        ));
    }

    match collection::host_soc(runner) {
        Ok(soc) => {
            let kernel = config.kernel_path(&soc);
            if kernel.exists() {
                results.push(CheckResult::pass_with(
                    "Kernel",
                    &kernel.display().to_string(),
                ));
            } else {
                results.push(CheckResult::warn(
                    "Kernel",
                    &format!(
                        "{} not found - SoC tag '{}' has no matching kernel",
                        kernel.display(),
                        soc
                    ),
                ));
            }
        }
        Err(e) => {
            results.push(CheckResult::warn(
                "Kernel",
                &format!("Cannot detect SoC: {}", e),
            ));
        }
    }

    for root in &config.search_roots {
        if !root.is_dir() {
            results.push(CheckResult::warn(
                "Extension root",
                &format!("{} is not a directory", root.display()),
            ));
        }
    }

    results
}
