//! Centralized command execution with consistent error handling.
//!
//! Every external tool (`kmutil`, `diskutil`, `uname`, `sudo`) goes through a
//! [`CommandRunner`]. The runner captures stdout and stderr, and a non-zero
//! exit becomes [`Error::ExternalCommand`] after the captured output has been
//! echoed to the operator.

use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Program used to elevate privileged commands.
pub const SUDO: &str = "sudo";

/// Result of a command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code, or -1 if terminated by signal.
    pub code: i32,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl CommandResult {
    /// A successful result with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Returns true if the command exited successfully.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Builder describing one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    /// Run through `sudo`.
    privileged: bool,
    /// Custom error message prefix.
    error_prefix: Option<String>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            privileged: false,
            error_prefix: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Add a path as an argument.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    /// Run the command under `sudo`.
    pub fn sudo(mut self) -> Self {
        self.privileged = true;
        self
    }

    /// Set a custom error message prefix.
    pub fn error_msg(mut self, msg: impl AsRef<str>) -> Self {
        self.error_prefix = Some(msg.as_ref().to_string());
        self
    }

    /// The program, without any `sudo` prefix.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    /// Full argument vector as it will be executed, `sudo` included.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        if self.privileged {
            argv.push(SUDO.to_string());
        }
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Human-readable command line for logs and errors.
    pub fn display(&self) -> String {
        self.argv().join(" ")
    }

    fn failure_prefix(&self) -> String {
        self.error_prefix.clone().unwrap_or_else(|| {
            if self.privileged {
                format!("'{} {}'", SUDO, self.program)
            } else {
                format!("'{}'", self.program)
            }
        })
    }
}

/// Runs external commands.
///
/// Implementors only provide [`execute`](CommandRunner::execute); exit status
/// handling lives in [`run`](CommandRunner::run) so every runner surfaces
/// failures the same way.
pub trait CommandRunner {
    /// Execute `cmd` and capture its output, whatever the exit code.
    fn execute(&self, cmd: &Cmd) -> Result<CommandResult>;

    /// Find `program` the way [`execute`](CommandRunner::execute) would.
    fn locate(&self, program: &str) -> Result<PathBuf> {
        which(program)
    }

    /// Execute `cmd`, failing with [`Error::ExternalCommand`] on non-zero exit.
    fn run(&self, cmd: &Cmd) -> Result<CommandResult> {
        let result = self.execute(cmd)?;
        if result.success() {
            return Ok(result);
        }

        surface_output(&result);
        Err(Error::ExternalCommand {
            command: cmd.failure_prefix(),
            code: result.code,
            stdout: result.stdout,
            stderr: result.stderr,
        })
    }
}

/// Echo a failed command's output to stderr so the operator sees it before abort.
fn surface_output(result: &CommandResult) {
    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(surfaced_text(result).as_bytes());
    let _ = stderr.flush();
}

/// Captured stdout then stderr, each ending in a newline when non-empty.
fn surfaced_text(result: &CommandResult) -> String {
    let mut text = String::new();
    for stream in [&result.stdout, &result.stderr] {
        if stream.is_empty() {
            continue;
        }
        text.push_str(stream);
        if !stream.ends_with('\n') {
            text.push('\n');
        }
    }
    text
}

/// Runs commands as real host processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&self, cmd: &Cmd) -> Result<CommandResult> {
        let argv = cmd.argv();
        let program = self.locate(&argv[0])?;

        info!("Running: {}", argv.join(" "));

        let output = Command::new(&program)
            .args(&argv[1..])
            .output()
            .map_err(|source| Error::Spawn {
                program: argv[0].clone(),
                source,
            })?;

        Ok(CommandResult {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Resolve a program on `PATH`.
pub fn which(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|_| Error::ToolNotFound {
        tool: program.to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
