//! RAM detection module
//!
//! Total physical memory from sysinfo, with /proc/meminfo as a Linux fallback.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sysinfo::System;

use super::{bytes_to_gb, ResourceDescription};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RamInfo {
    /// Total physical memory in bytes
    pub total_bytes: u64,
}

impl RamInfo {
    pub fn detect() -> Result<Self> {
        let mut sys = System::new();
        sys.refresh_memory();

        let total_bytes = sys.total_memory();

        #[cfg(target_os = "linux")]
        let total_bytes = match total_bytes {
            0 => Self::meminfo_total_bytes().unwrap_or(0),
            n => n,
        };

        if total_bytes == 0 {
            anyhow::bail!("Total memory not reported");
        }

        Ok(Self { total_bytes })
    }

    /// Get total memory from /proc/meminfo (Linux only)
    #[cfg(target_os = "linux")]
    fn meminfo_total_bytes() -> Option<u64> {
        let content = std::fs::read_to_string("/proc/meminfo").ok()?;
        parse_meminfo_total(&content)
    }

    pub fn description(&self) -> ResourceDescription {
        ResourceDescription::new(
            "RAM Name: Physical Memory",
            format!(
                "RAM Characteristics: {:.2} GB",
                bytes_to_gb(self.total_bytes)
            ),
        )
    }
}

/// Parse `MemTotal:       16384000 kB` into bytes.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_meminfo_total(content: &str) -> Option<u64> {
    content
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meminfo_total() {
        let content = "MemTotal:       16384000 kB\nMemFree:         1234 kB\n";
        assert_eq!(parse_meminfo_total(content), Some(16_384_000 * 1024));
        assert_eq!(parse_meminfo_total("MemFree: 1 kB"), None);
    }

    #[test]
    fn test_description_in_gigabytes() {
        let info = RamInfo {
            total_bytes: 16 * 1024 * 1024 * 1024,
        };
        let d = info.description();
        assert_eq!(d.name, "RAM Name: Physical Memory");
        assert_eq!(d.characteristics, "RAM Characteristics: 16.00 GB");
    }
}
