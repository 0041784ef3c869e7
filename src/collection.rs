//! Build a boot kernel collection without one kext.

use log::{info, warn};
use std::path::PathBuf;

use crate::config::KcConfig;
use crate::error::Result;
use crate::kext_list::BundleId;
use crate::process::{Cmd, CommandRunner};

/// Everything `kmutil create` needs for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelCollectionSpec {
    pub collection: String,
    pub arch: String,
    pub output: PathBuf,
    pub variant: String,
    pub kernel: PathBuf,
    pub search_roots: Vec<PathBuf>,
    pub kexts: Vec<BundleId>,
}

impl KernelCollectionSpec {
    /// Spec for `config` with the given kernel SoC tag and kext list.
    pub fn new(config: &KcConfig, soc: &str, kexts: Vec<BundleId>) -> Self {
        Self {
            collection: config.collection.clone(),
            arch: config.arch.clone(),
            output: config.kc_output.clone(),
            variant: config.variant.clone(),
            kernel: config.kernel_path(soc),
            search_roots: config.search_roots.clone(),
            kexts,
        }
    }

    /// The privileged `kmutil create` invocation for this spec.
    pub fn command(&self) -> Cmd {
        let mut cmd = Cmd::new("kmutil")
            .arg("create")
            .args(["-n", self.collection.as_str()])
            .args(["-a", self.arch.as_str()])
            .arg("-B")
            .arg_path(&self.output)
            .args(["-V", self.variant.as_str()])
            .arg("-k")
            .arg_path(&self.kernel);

        for root in &self.search_roots {
            cmd = cmd.arg("-r").arg_path(root);
        }

        // -x: only the kexts named with -b, nothing pulled in implicitly
        cmd = cmd.arg("-x");
        for kext in &self.kexts {
            cmd = cmd.arg("-b").arg(kext);
        }

        cmd.sudo().error_msg("kmutil create")
    }

    /// Run the build. Writes (or overwrites) the collection at `output`.
    pub fn build(self, runner: &impl CommandRunner) -> Result<PathBuf> {
        info!(
            "Building {} collection with {} kexts -> {}",
            self.collection,
            self.kexts.len(),
            self.output.display()
        );
        runner.run(&self.command())?;
        Ok(self.output)
    }
}

/// Remove every occurrence of `excluded`, keeping the order of the rest.
///
/// Returns the filtered list and how many entries were dropped.
pub fn exclude_kext(kexts: Vec<BundleId>, excluded: &str) -> (Vec<BundleId>, usize) {
    let before = kexts.len();
    let kept: Vec<BundleId> = kexts.into_iter().filter(|k| k != excluded).collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// SoC tag from `uname -v` output.
///
/// `Darwin Kernel Version 23.1.0: ...; root:xnu-10002.41.9~6/RELEASE_ARM64_T8103`
/// yields `t8103`: the first line, after its final underscore, lowercased.
pub fn soc_from_uname(uname: &str) -> String {
    let first = uname.lines().next().unwrap_or_default();
    first
        .rsplit('_')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Ask the host for its SoC tag.
pub fn host_soc(runner: &impl CommandRunner) -> Result<String> {
    let output = runner.run(&Cmd::new("uname").arg("-v"))?;
    Ok(soc_from_uname(&output.stdout))
}

/// Exclude `config.exclude` from `kexts` and build the collection.
pub fn build_without(
    runner: &impl CommandRunner,
    config: &KcConfig,
    kexts: Vec<BundleId>,
) -> Result<PathBuf> {
    let (kexts, removed) = exclude_kext(kexts, &config.exclude);
    let excluded = &config.exclude;
    match removed {
        0 => warn!("{excluded} is not in the boot collection; building anyway"),
        1 => info!("Excluding {excluded}"),
        n => warn!("{excluded} listed {n} times; excluding all of them"),
    }

    let soc = host_soc(runner)?;
    info!("Host SoC: {}", soc);

    KernelCollectionSpec::new(config, &soc, kexts).build(runner)
}
