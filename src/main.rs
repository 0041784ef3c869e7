//! kc-noshim - rebuild the boot kernel collection without AppleSerialShim.
//!
//! Produces:
//! - /Library/KernelCollections/kc.noshim.macho (the new boot collection)
//! - kc.noshim.macho.installer.sh next to it (activates it with kmutil configure-boot)

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kc_noshim::process::SystemRunner;
use kc_noshim::{logging, KcConfig};

#[derive(Parser)]
#[command(name = "kc-noshim")]
#[command(about = "Rebuild the macOS boot kernel collection without one kext")]
#[command(
    after_help = "QUICK START:\n  kc-noshim preflight  Check host tools\n  kc-noshim kexts      List kexts in the boot collection\n  kc-noshim            Build the collection and stage its installer"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bundle identifier to leave out of the new collection
    #[arg(long, global = true, default_value = kc_noshim::config::DEFAULT_EXCLUDED_KEXT)]
    exclude: String,

    /// Where to write the new kernel collection
    #[arg(long, global = true, default_value = kc_noshim::config::DEFAULT_KC_OUTPUT)]
    kc_output: PathBuf,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the collection and stage its installer (default)
    Run,

    /// Build the collection only
    Build,

    /// Stage the installer for an already built collection
    Installer,

    /// List the kexts linked into the boot collection
    Kexts,

    /// Run preflight checks (verify host tools before a rebuild)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Print the installer script for a volume UUID
    Script {
        /// APFS volume UUID
        uuid: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init(cli.verbose).context("Failed to start logger")?;

    let config = KcConfig {
        exclude: cli.exclude,
        kc_output: cli.kc_output,
        ..KcConfig::default()
    };
    let runner = SystemRunner;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::cmd_run(&runner, &config)?,
        Commands::Build => commands::cmd_build(&runner, &config)?,
        Commands::Installer => commands::cmd_installer(&runner, &config)?,
        Commands::Kexts => commands::cmd_kexts(&runner, &config)?,
        Commands::Preflight { strict } => commands::cmd_preflight(&runner, &config, strict)?,
        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Script { uuid } => commands::show::ShowTarget::Script { uuid },
            };
            commands::cmd_show(show_target, &config)?;
        }
    }

    Ok(())
}
