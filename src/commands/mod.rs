//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `run` - Build the collection and stage its installer
//! - `build` - Build the collection only
//! - `installer` - Stage the installer only
//! - `kexts` - List the kexts in the boot collection
//! - `preflight` - Run preflight checks
//! - `show` - Display information

mod build;
mod installer;
mod kexts;
mod preflight;
mod run;
pub mod show;

pub use build::cmd_build;
pub use installer::cmd_installer;
pub use kexts::cmd_kexts;
pub use preflight::cmd_preflight;
pub use run::cmd_run;
pub use show::cmd_show;
