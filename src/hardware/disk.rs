//! System volume detection
//!
//! Reports the capacity of the volume mounted at the filesystem root (`/` or
//! the system drive on Windows), falling back to the largest mounted disk.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sysinfo::Disks;

use super::{bytes_to_gb, ResourceDescription};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskInfo {
    pub mount_point: String,
    /// Total capacity in bytes
    pub total_bytes: u64,
}

impl DiskInfo {
    pub fn detect() -> Result<Self> {
        let disks = Disks::new_with_refreshed_list();
        let volumes: Vec<(String, u64)> = disks
            .list()
            .iter()
            .map(|d| (d.mount_point().display().to_string(), d.total_space()))
            .collect();

        pick_system_volume(&volumes)
            .map(|(mount_point, total_bytes)| Self {
                mount_point,
                total_bytes,
            })
            .ok_or_else(|| anyhow::anyhow!("No mounted volume reported"))
    }

    pub fn description(&self) -> ResourceDescription {
        ResourceDescription::new(
            "Disk Name: System Disk",
            format!(
                "Disk Characteristics: {:.2} GB Total",
                bytes_to_gb(self.total_bytes)
            ),
        )
    }
}

fn is_root_mount(mount_point: &str) -> bool {
    let path = Path::new(mount_point);
    path.parent().is_none() && path.has_root()
}

fn pick_system_volume(volumes: &[(String, u64)]) -> Option<(String, u64)> {
    volumes
        .iter()
        .filter(|(_, total)| *total > 0)
        .find(|(mount, _)| is_root_mount(mount))
        .or_else(|| {
            volumes
                .iter()
                .filter(|(_, total)| *total > 0)
                .max_by_key(|(_, total)| *total)
        })
        .cloned()
}
