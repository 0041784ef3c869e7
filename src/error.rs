//! Error types for kernel collection rebuilds.
//!
//! Every variant is fatal: the CLI aborts the run on the first one it sees.

use std::path::PathBuf;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required host tool is not on `PATH`.
    #[error("'{tool}' not found in PATH")]
    ToolNotFound { tool: String },

    /// An external command exited non-zero.
    #[error("{command} failed (exit code {code})")]
    ExternalCommand {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The command could not be spawned at all.
    #[error("failed to execute '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// `kmutil inspect` output did not have one or two section markers.
    #[error(
        "kmutil inspect output has {markers} 'Extension Information:' markers (expected 1 or 2)"
    )]
    Format { markers: usize },

    /// No APFS volume has a snapshot mounted on `/`.
    #[error("can't find parent volume of snapshot mounted on '/'")]
    Resolution,

    /// `diskutil list -plist` returned something that is not a property list.
    #[error("invalid disk listing")]
    Plist(#[from] plist::Error),

    #[error("{context}: {}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(
        context: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::Io {
            context,
            path: path.into(),
            source,
        }
    }
}
