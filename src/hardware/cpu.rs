//! CPU detection module
//!
//! Detects CPU information using:
//! - Cross-platform: sysinfo crate
//! - Linux: cpufreq sysfs for the max clock

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sysinfo::System;

use super::ResourceDescription;

/// CPU information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuInfo {
    /// CPU name (e.g., "AMD Ryzen 7 5800X")
    pub name: String,
    /// Number of physical cores
    pub cores: usize,
    /// Number of logical threads
    pub threads: usize,
    /// Current frequency in MHz (if available)
    pub frequency_mhz: Option<u64>,
    /// Max turbo/boost frequency in MHz (if available)
    pub max_frequency_mhz: Option<u64>,
}

impl CpuInfo {
    pub fn detect() -> Result<Self> {
        let mut sys = System::new();
        sys.refresh_cpu_all();

        let cpus = sys.cpus();
        if cpus.is_empty() {
            anyhow::bail!("No CPU detected");
        }

        let first_cpu = &cpus[0];
        let name = first_cpu.brand().trim().to_string();
        let frequency_mhz = Some(first_cpu.frequency()).filter(|f| *f > 0);

        let threads = cpus.len();
        let cores = sys.physical_core_count().unwrap_or(threads);

        #[cfg(target_os = "linux")]
        let max_frequency_mhz = Self::linux_max_frequency();

        #[cfg(not(target_os = "linux"))]
        let max_frequency_mhz = None;

        Ok(CpuInfo {
            name,
            cores,
            threads,
            frequency_mhz,
            max_frequency_mhz,
        })
    }

    #[cfg(target_os = "linux")]
    fn linux_max_frequency() -> Option<u64> {
        let raw =
            std::fs::read_to_string("/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq")
                .or_else(|_| {
                    std::fs::read_to_string(
                        "/sys/devices/system/cpu/cpu0/cpufreq/scaling_max_freq",
                    )
                })
                .ok()?;
        let khz = raw.trim().parse::<u64>().ok()?;
        Some(khz / 1000)
    }

    pub fn description(&self) -> ResourceDescription {
        let name = if self.name.is_empty() {
            "Unknown CPU"
        } else {
            self.name.as_str()
        };
        let clock = match self.max_frequency_mhz.or(self.frequency_mhz) {
            Some(mhz) => format!("{:.2} GHz", mhz as f64 / 1000.0),
            None => "Unknown GHz".to_string(),
        };

        ResourceDescription::new(
            format!("CPU Name: {name}"),
            format!(
                "CPU Characteristics: {} Cores, {} Threads, {clock}",
                self.cores, self.threads
            ),
        )
    }
}
