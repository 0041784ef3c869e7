//! Logger setup for the CLI.

use flexi_logger::{Logger, LoggerHandle};

/// Start logging to stderr. Keep the handle alive for the whole run.
pub fn init(verbose: bool) -> Result<LoggerHandle, flexi_logger::FlexiLoggerError> {
    let spec = if verbose { "debug" } else { "info" };
    Logger::try_with_str(spec)?.log_to_stderr().start()
}
