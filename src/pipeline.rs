//! The full rebuild: new collection first, then its installer.
//!
//! Steps run in a fixed order and the first error aborts the run. Nothing is
//! rolled back; `kmutil` owns the atomicity of its own output.

use log::info;
use std::path::PathBuf;

use crate::collection;
use crate::config::KcConfig;
use crate::error::Result;
use crate::installer;
use crate::kext_list;
use crate::process::CommandRunner;
use crate::timing::Timer;
use crate::volume;

/// Paths produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub kc: PathBuf,
    pub installer: PathBuf,
    pub volume_uuid: String,
}

/// Inspect the boot KC and build a copy without `config.exclude`.
pub fn build_collection(runner: &impl CommandRunner, config: &KcConfig) -> Result<PathBuf> {
    let timer = Timer::start("Kernel collection");
    let kexts = kext_list::base_kexts(runner, config)?;
    info!("Boot collection has {} kexts", kexts.len());
    let kc = collection::build_without(runner, config, kexts)?;
    timer.finish();
    Ok(kc)
}

/// Resolve the system volume and write its installer script.
pub fn stage_installer(
    runner: &impl CommandRunner,
    config: &KcConfig,
) -> Result<(String, PathBuf)> {
    let timer = Timer::start("Installer script");
    let uuid = volume::system_volume_uuid(runner)?;
    info!("System volume: {}", uuid);
    let installer = installer::emit_installer(runner, config, &uuid)?;
    timer.finish();
    Ok((uuid, installer))
}

/// Build the collection, then stage its installer.
pub fn run(runner: &impl CommandRunner, config: &KcConfig) -> Result<RunOutput> {
    let kc = build_collection(runner, config)?;
    let (volume_uuid, installer) = stage_installer(runner, config)?;
    Ok(RunOutput {
        kc,
        installer,
        volume_uuid,
    })
}
