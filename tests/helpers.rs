//! Shared test utilities for kc-noshim tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

use kc_noshim::process::{Cmd, CommandResult, CommandRunner};
use kc_noshim::{Error, KcConfig, Result};

pub const MARKER: &str = "Extension Information:";

/// A file handed to `mv`, captured before it moved.
#[derive(Debug, Clone)]
pub struct MovedFile {
    pub dest: PathBuf,
    pub content: String,
    pub mode: u32,
}

/// Answers commands from canned output and records every call.
///
/// Responses are keyed by program (`"kmutil"`) or by program and first
/// argument (`"kmutil create"`); the more specific key wins.
///
/// `mv` is performed for real so the installer ends up at its destination.
#[derive(Default)]
pub struct FakeRunner {
    responses: HashMap<String, CommandResult>,
    missing: HashSet<String>,
    pub calls: RefCell<Vec<Cmd>>,
    pub moved: RefCell<Vec<MovedFile>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `key` with `stdout` and exit code 0.
    pub fn respond(mut self, key: &str, stdout: impl Into<String>) -> Self {
        self.responses
            .insert(key.to_string(), CommandResult::ok(stdout));
        self
    }

    /// Reply to `key` with a failure.
    pub fn fail(mut self, key: &str, code: i32, stderr: &str) -> Self {
        self.responses.insert(
            key.to_string(),
            CommandResult {
                code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Pretend `tool` is not installed.
    pub fn without_tool(mut self, tool: &str) -> Self {
        self.missing.insert(tool.to_string());
        self
    }

    /// Calls whose program and first argument match, e.g. `("kmutil", "create")`.
    pub fn calls_to(&self, program: &str, subcommand: &str) -> Vec<Cmd> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program() == program)
            .filter(|c| c.get_args().first().map(String::as_str) == Some(subcommand))
            .cloned()
            .collect()
    }

    fn do_move(&self, cmd: &Cmd) -> CommandResult {
        let [src, dest] = cmd.get_args() else {
            return CommandResult {
                code: 64,
                stdout: String::new(),
                stderr: "usage: mv src dest".to_string(),
            };
        };
        let content = fs::read_to_string(src).expect("mv source readable");
        let mode = fs::metadata(src)
            .expect("mv source exists")
            .permissions()
            .mode();
        fs::copy(src, dest).expect("copy to destination");
        fs::remove_file(src).expect("remove source");
        self.moved.borrow_mut().push(MovedFile {
            dest: PathBuf::from(dest),
            content,
            mode,
        });
        CommandResult::ok("")
    }
}

impl CommandRunner for FakeRunner {
    fn locate(&self, program: &str) -> Result<PathBuf> {
        if self.missing.contains(program) {
            return Err(Error::ToolNotFound {
                tool: program.to_string(),
            });
        }
        Ok(PathBuf::from("/usr/bin").join(program))
    }

    fn execute(&self, cmd: &Cmd) -> Result<CommandResult> {
        // argv[0] is `sudo` for privileged commands, argv[1] the tool itself
        let argv = cmd.argv();
        if let Some(tool) = argv.iter().take(2).find(|p| self.missing.contains(*p)) {
            let tool = tool.clone();
            return Err(Error::ToolNotFound { tool });
        }
        self.calls.borrow_mut().push(cmd.clone());
        if cmd.program() == "mv" {
            return Ok(self.do_move(cmd));
        }
        let sub = cmd.get_args().first().map_or("", String::as_str);
        let sub_key = format!("{} {}", cmd.program(), sub);
        Ok(self
            .responses
            .get(&sub_key)
            .or_else(|| self.responses.get(cmd.program()))
            .cloned()
            .unwrap_or_else(|| CommandResult {
                code: 127,
                stdout: String::new(),
                stderr: format!("unexpected command: {}", cmd.display()),
            }))
    }
}

/// Config pointing every output path into a temp directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    pub config: KcConfig,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path();
        fs::create_dir_all(base.join("KernelCollections")).expect("Failed to create KC dir");

        let config = KcConfig {
            kc_output: base.join("KernelCollections/kc.noshim.macho"),
            kernels_dir: base.join("Kernels"),
            ..KcConfig::default()
        };

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }
}

/// `kmutil inspect` output with a base section and an auxiliary section.
pub fn inspect_report(base: &[&str], aux: &[&str]) -> String {
    let mut out = String::new();
    out.push_str(MARKER);
    out.push('\n');
    for id in base {
        out.push_str(&format!(
            "{id} (1.0.0) 5A1B2C3D-0000-0000-0000-000000000000 <1 2 3>\n"
        ));
    }
    out.push_str(MARKER);
    out.push('\n');
    for id in aux {
        out.push_str(&format!("{id} (1.0.0)\n"));
    }
    out
}

/// `diskutil list -plist` output with one disk, one volume and one snapshot on `/`.
pub fn disk_listing(uuid: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>AllDisksAndPartitions</key>
	<array>
		<dict>
			<key>DeviceIdentifier</key><string>disk3</string>
			<key>APFSVolumes</key>
			<array>
				<dict>
					<key>VolumeName</key><string>Macintosh HD</string>
					<key>VolumeUUID</key><string>{uuid}</string>
					<key>MountedSnapshots</key>
					<array>
						<dict><key>SnapshotMountPoint</key><string>/</string></dict>
					</array>
				</dict>
			</array>
		</dict>
	</array>
</dict>
</plist>
"#
    )
}

pub const UNAME: &str =
    "Darwin Kernel Version 23.1.0: Mon Oct  9 21:28:12 PDT 2023; root:xnu-10002.41.9~6/RELEASE_ARM64_T8103\n";
