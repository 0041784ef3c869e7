//! Preflight check types and report.

/// Result of a single preflight check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// A required tool is missing; nothing can run.
    Fail,
    /// Usable now, but something later (the build or the installer) may fail.
    Warn,
}

impl CheckResult {
    pub fn pass_with(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: Some(details.to_string()),
        }
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            details: Some(details.to_string()),
        }
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            details: Some(details.to_string()),
        }
    }
}

/// Results of all preflight checks.
#[derive(Debug, Default)]
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Failed checks, in the order they ran.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| c.status == CheckStatus::Fail)
    }

    pub fn fail_count(&self) -> usize {
        self.failures().count()
    }

    /// Checks that passed with a warning.
    pub fn warnings(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| c.status == CheckStatus::Warn)
    }

    pub fn warn_count(&self) -> usize {
        self.warnings().count()
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let (icon, status_str) = match check.status {
                CheckStatus::Pass => ("✓", "PASS"),
                CheckStatus::Fail => ("✗", "FAIL"),
                CheckStatus::Warn => ("⚠", "WARN"),
            };

            print!("  {} [{}] {}", icon, status_str, check.name);
            match &check.details {
                Some(details) => println!(": {}", details),
                None => println!(),
            }
        }

        println!();
        let passed = self
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count();

        println!("Summary: {}/{} passed", passed, self.checks.len());
        if self.fail_count() > 0 {
            let failed = self.fail_count();
            println!("         {failed} FAILED - rebuild will not run");
        }
        if self.warn_count() > 0 {
            println!("         {} warnings", self.warn_count());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_fail_report() {
        let report = PreflightReport {
            checks: vec![
                CheckResult::pass_with("kmutil", "/usr/bin/kmutil"),
                CheckResult::warn("PlistBuddy", "missing"),
            ],
        };
        assert!(report.all_passed());
        assert_eq!(report.warn_count(), 1);
    }

    #[test]
    fn test_failures_in_order() {
        let report = PreflightReport {
            checks: vec![
                CheckResult::fail("kmutil", "missing"),
                CheckResult::pass_with("uname", "/usr/bin/uname"),
                CheckResult::fail("diskutil", "missing"),
            ],
        };
        let names: Vec<&str> = report.failures().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["kmutil", "diskutil"]);
        assert_eq!(report.fail_count(), 2);
    }
}
