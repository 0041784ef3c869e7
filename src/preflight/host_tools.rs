//! Host tool availability checks.

use std::path::Path;

use crate::process::CommandRunner;

use super::types::CheckResult;

/// Tools every run needs, with what they are used for.
pub const REQUIRED_TOOLS: [(&str, &str); 4] = [
    ("kmutil", "Required to inspect and build collections"),
    ("diskutil", "Required to find the system volume"),
    ("uname", "Required to detect the SoC"),
    ("sudo", "Required to write to /Library/KernelCollections"),
];

/// Used by the generated installer, not by the rebuild itself.
pub const PLIST_BUDDY: &str = "/usr/libexec/PlistBuddy";

/// Check host tools are installed, looking them up the way `runner` would.
pub fn check_host_tools(runner: &impl CommandRunner) -> Vec<CheckResult> {
    let mut results: Vec<CheckResult> = REQUIRED_TOOLS
        .iter()
        .map(|(tool, purpose)| check_tool_exists(runner, tool, purpose))
        .collect();

    if Path::new(PLIST_BUDDY).exists() {
        results.push(CheckResult::pass_with("PlistBuddy", PLIST_BUDDY));
    } else {
        results.push(CheckResult::warn(
            "PlistBuddy",
            &format!("{PLIST_BUDDY} not found - the installer script will fail"),
        ));
    }

    results
}

/// Check if a tool exists in PATH.
fn check_tool_exists(runner: &impl CommandRunner, tool: &str, purpose: &str) -> CheckResult {
    match runner.locate(tool) {
        Ok(path) => CheckResult::pass_with(tool, &path.display().to_string()),
        Err(_) => CheckResult::fail(tool, &format!("Not found in PATH. {}", purpose)),
    }
}
