//! Find the APFS volume behind the booted root snapshot.
//!
//! On a sealed system volume `/` is a snapshot mount, so the volume's own
//! `MountPoint` is not `/`. The listing from `diskutil list -plist` nests
//! disks, their APFS volumes and each volume's mounted snapshots; the volume
//! we want owns the snapshot whose `SnapshotMountPoint` is `/`.

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::process::{Cmd, CommandRunner};

/// Mount point of the booted root snapshot.
pub const ROOT_MOUNT_POINT: &str = "/";

/// Top level of `diskutil list -plist`.
#[derive(Debug, Default, Deserialize)]
pub struct DiskListing {
    #[serde(rename = "AllDisksAndPartitions", default)]
    pub disks: Vec<Disk>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Disk {
    #[serde(rename = "DeviceIdentifier", default)]
    pub device: Option<String>,
    #[serde(rename = "APFSVolumes", default)]
    pub apfs_volumes: Vec<ApfsVolume>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApfsVolume {
    #[serde(rename = "VolumeUUID", default)]
    pub uuid: Option<String>,
    #[serde(rename = "VolumeName", default)]
    pub name: Option<String>,
    #[serde(rename = "MountedSnapshots", default)]
    pub mounted_snapshots: Vec<MountedSnapshot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MountedSnapshot {
    #[serde(rename = "SnapshotMountPoint", default)]
    pub mount_point: Option<String>,
}

impl ApfsVolume {
    fn has_root_snapshot(&self) -> bool {
        self.mounted_snapshots
            .iter()
            .any(|snap| snap.mount_point.as_deref() == Some(ROOT_MOUNT_POINT))
    }
}

impl DiskListing {
    /// Parse the raw property list.
    pub fn from_plist(bytes: &[u8]) -> Result<Self> {
        Ok(plist::from_bytes(bytes)?)
    }

    /// UUID of the first volume with a snapshot mounted on `/`.
    pub fn root_volume_uuid(&self) -> Result<&str> {
        for disk in &self.disks {
            for vol in &disk.apfs_volumes {
                if !vol.has_root_snapshot() {
                    continue;
                }
                if let Some(uuid) = vol.uuid.as_deref() {
                    debug!(
                        "Root snapshot on {} ({})",
                        vol.name.as_deref().unwrap_or("unnamed volume"),
                        disk.device.as_deref().unwrap_or("unknown disk")
                    );
                    return Ok(uuid);
                }
            }
        }
        Err(Error::Resolution)
    }
}

/// Resolve the UUID of the system volume via `diskutil`.
pub fn system_volume_uuid(runner: &impl CommandRunner) -> Result<String> {
    let output = runner.run(&Cmd::new("diskutil").args(["list", "-plist"]))?;
    let listing = DiskListing::from_plist(output.stdout.as_bytes())?;
    listing.root_volume_uuid().map(str::to_string)
}
