//! Kexts command - list the kexts linked into the boot collection.

use anyhow::{Context, Result};

use kc_noshim::kext_list;
use kc_noshim::process::CommandRunner;
use kc_noshim::KcConfig;

/// Execute the kexts command.
///
/// The excluded kext is marked so it is easy to confirm it is present.
pub fn cmd_kexts(runner: &impl CommandRunner, config: &KcConfig) -> Result<()> {
    let kexts = kext_list::base_kexts(runner, config)
        .with_context(|| format!("Inspecting {}", config.boot_kc.display()))?;

    for kext in &kexts {
        if kext == config.exclude.as_str() {
            println!("{}  (excluded)", kext);
        } else {
            println!("{}", kext);
        }
    }
    println!();
    println!("{} kexts", kexts.len());
    Ok(())
}
