//! Extract the base kext list from `kmutil inspect` output.
//!
//! The output of `kmutil inspect --no-header` looks like:
//!
//! ```text
//! Extension Information:
//! com.apple.kpi.bsd (21.0.0) ...
//! com.apple.driver.AppleSerialShim (1.0) ...
//! Extension Information:
//! com.apple.driver.SomethingInAuxKC (2.0) ...
//! ```
//!
//! The first section lists the kexts linked into the boot collection. When
//! there is a second marker, it introduces an unrelated section that must be
//! ignored.

use std::fmt;

use crate::config::KcConfig;
use crate::error::{Error, Result};
use crate::process::{Cmd, CommandRunner};

/// A kext bundle identifier, e.g. `com.apple.driver.AppleSerialShim`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleId(String);

impl BundleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BundleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BundleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BundleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Grammar of the inspection report.
///
/// - a section starts at a line exactly equal to `marker`
/// - with two markers, the body is the lines strictly between them
/// - with one marker, the body is every line after it
/// - any other marker count is a format error
/// - each body line names its kext in its first whitespace-delimited token
#[derive(Debug, Clone, Copy)]
pub struct InspectionGrammar {
    pub marker: &'static str,
}

impl Default for InspectionGrammar {
    fn default() -> Self {
        Self {
            marker: "Extension Information:",
        }
    }
}

impl InspectionGrammar {
    /// Select the body lines of the base collection section.
    pub fn base_section<'a>(&self, lines: &'a [&'a str]) -> Result<&'a [&'a str]> {
        let markers: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| **line == self.marker)
            .map(|(i, _)| i)
            .collect();

        match markers.as_slice() {
            [first, second] => Ok(&lines[first + 1..*second]),
            [only] => Ok(&lines[only + 1..]),
            other => Err(Error::Format {
                markers: other.len(),
            }),
        }
    }

    /// Parse a full report into bundle identifiers, in report order.
    pub fn parse(&self, report: &str) -> Result<Vec<BundleId>> {
        let lines: Vec<&str> = report.lines().collect();
        let body = self.base_section(&lines)?;

        Ok(body
            .iter()
            .filter_map(|line| line.split_whitespace().next())
            .map(BundleId::new)
            .collect())
    }
}

/// Parse `kmutil inspect` output with the default grammar.
pub fn parse_inspection_report(report: &str) -> Result<Vec<BundleId>> {
    InspectionGrammar::default().parse(report)
}

/// `kmutil inspect` invocation for the configured boot collection.
pub fn inspect_command(config: &KcConfig) -> Cmd {
    Cmd::new("kmutil")
        .args(["inspect", "-V"])
        .arg(&config.variant)
        .args(["--no-header", "-p"])
        .arg_path(&config.boot_kc)
}

/// List the kexts linked into the configured boot collection.
pub fn base_kexts(runner: &impl CommandRunner, config: &KcConfig) -> Result<Vec<BundleId>> {
    let output = runner.run(&inspect_command(config))?;
    parse_inspection_report(&output.stdout)
}
