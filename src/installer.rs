//! Installer script for the rebuilt collection.
//!
//! The script is run later, by hand, to point the system volume's boot policy
//! at the new collection with `kmutil configure-boot`. It looks the volume up
//! by UUID when it runs, because the mount point at build time is not
//! guaranteed to be the one at install time.

use log::info;
use shell_escape::escape;
use std::borrow::Cow;
use std::fs::Permissions;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::config::KcConfig;
use crate::error::{Error, Result};
use crate::process::{Cmd, CommandRunner};

/// Mode of the installed script: rwxr-xr-x.
pub const INSTALLER_MODE: u32 = 0o755;

/// Render the installer for the volume `vol_uuid`.
///
/// `kc_path` is the collection's absolute path on that volume; the script
/// prefixes it with wherever the volume is mounted at install time. Both
/// values are shell-quoted; plain paths and UUIDs come out unchanged.
pub fn render_script(vol_uuid: &str, kc_path: &Path) -> String {
    let vol_uuid = escape(Cow::Borrowed(vol_uuid));
    let kc_path = quote_path(kc_path);
    format!(
        r#"#!/usr/bin/env bash

set -o errexit
set -o nounset
set -o pipefail
set -o xtrace

info_tmp_path=$(mktemp)
diskutil info -plist {vol_uuid} > "${{info_tmp_path}}"
mount_point=$(/usr/libexec/PlistBuddy -c "Print MountPoint" "${{info_tmp_path}}")

{{ echo "Installing to \"${{mount_point}}\""; }} 2> /dev/null

kmutil configure-boot -c "${{mount_point}}"{kc_path} -C -v "${{mount_point}}"
"#
    )
}

/// Quote a path for the shell; paths of safe characters are left bare.
fn quote_path(path: &Path) -> String {
    let path = path.to_string_lossy();
    escape(Cow::Borrowed(&path)).into_owned()
}

/// Write the installer for `vol_uuid` next to the configured collection.
///
/// The script is staged in a temp file, made executable, then moved into
/// place with `sudo mv`, replacing any previous installer.
pub fn emit_installer(
    runner: &impl CommandRunner,
    config: &KcConfig,
    vol_uuid: &str,
) -> Result<PathBuf> {
    let script = render_script(vol_uuid, &config.kc_output);
    let staged = stage_script(&script)?;

    let dest = config.installer_path();
    info!("Installing script to {}", dest.display());
    runner.run(
        &Cmd::new("mv")
            .arg_path(&staged)
            .arg_path(&dest)
            .sudo()
            .error_msg("moving installer script into place"),
    )?;

    // staged is gone after the move; dropping it is a no-op then
    drop(staged);
    Ok(dest)
}

/// Write `script` to a fresh temp file with [`INSTALLER_MODE`].
fn stage_script(script: &str) -> Result<tempfile::TempPath> {
    let tmp_dir = std::env::temp_dir();
    let mut file = tempfile::Builder::new()
        .prefix("kc-noshim-installer")
        .suffix(".sh")
        .tempfile()
        .map_err(|e| Error::io("creating temp file", &tmp_dir, e))?;

    file.write_all(script.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| Error::io("writing installer script", file.path(), e))?;

    file.as_file()
        .set_permissions(Permissions::from_mode(INSTALLER_MODE))
        .map_err(|e| Error::io("making installer executable", file.path(), e))?;

    Ok(file.into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_pure_function_of_uuid() {
        let kc = Path::new("/Library/KernelCollections/kc.noshim.macho");
        assert_eq!(render_script("ABC-123", kc), render_script("ABC-123", kc));
        assert_ne!(render_script("ABC-123", kc), render_script("DEF-456", kc));
    }

    #[test]
    fn test_script_strict_mode() {
        let script = render_script("ABC-123", Path::new("/kc"));
        assert!(script.starts_with("#!/usr/bin/env bash\n"));
        for opt in ["errexit", "nounset", "pipefail", "xtrace"] {
            assert!(script.contains(&format!("set -o {opt}\n")), "missing {opt}");
        }
    }

    #[test]
    fn test_script_resolves_mount_point_by_uuid() {
        let script = render_script(
            "ABC-123",
            Path::new("/Library/KernelCollections/kc.noshim.macho"),
        );
        assert!(script.contains("diskutil info -plist ABC-123 > \"${info_tmp_path}\"\n"));
        assert!(script.contains("PlistBuddy -c \"Print MountPoint\""));
        assert!(script.contains(
            "kmutil configure-boot -c \"${mount_point}\"/Library/KernelCollections/kc.noshim.macho -C -v \"${mount_point}\"\n"
        ));
    }

    #[test]
    fn test_hostile_kc_path_is_single_quoted() {
        let script = render_script("ABC-123", Path::new("/tmp/a\"b $(id)"));
        assert!(script.contains(
            "kmutil configure-boot -c \"${mount_point}\"'/tmp/a\"b $(id)' -C -v \"${mount_point}\"\n"
        ));
        assert!(!script.contains("\"${mount_point}/tmp/a\"b"));
    }

    #[test]
    fn test_single_quote_in_kc_path_is_escaped() {
        let script = render_script("ABC-123", Path::new("/tmp/it's"));
        let line = script
            .lines()
            .find(|l| l.starts_with("kmutil configure-boot"))
            .unwrap();
        assert!(line.contains(r#""${mount_point}"'/tmp/it'\''s' "#));
        assert!(line.ends_with("-C -v \"${mount_point}\""));
    }

    #[test]
    fn test_stage_script_is_executable() {
        let staged = stage_script("#!/bin/sh\n").unwrap();
        let mode = std::fs::metadata(&staged).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, INSTALLER_MODE);
        assert_eq!(std::fs::read_to_string(&staged).unwrap(), "#!/bin/sh\n");
    }
}
