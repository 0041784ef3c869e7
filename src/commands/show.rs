//! Show command - displays information.

use anyhow::Result;

use kc_noshim::installer;
use kc_noshim::KcConfig;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// Print the installer script for a volume UUID without writing it
    Script { uuid: String },
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &KcConfig) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Script { uuid } => {
            print!("{}", installer::render_script(&uuid, &config.kc_output));
        }
    }
    Ok(())
}
