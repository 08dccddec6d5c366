//! Environment info provider
//!
//! Describes the resource each test kind is about (processor, memory, system
//! volume) using sysinfo plus a few Linux sysfs/procfs reads. Detection never
//! fails the caller: missing metadata degrades to placeholder text.

pub mod cpu;
pub mod disk;
pub mod ram;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::benchmark::TestKind;

use cpu::CpuInfo;
use disk::DiskInfo;
use ram::RamInfo;

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_CHARACTERISTICS: &str = "No information available";

/// Static description of the resource a test view is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescription {
    pub name: String,
    pub characteristics: String,
}

impl ResourceDescription {
    pub fn new(name: impl Into<String>, characteristics: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            characteristics: characteristics.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_NAME, UNKNOWN_CHARACTERISTICS)
    }
}

/// Source of per-kind resource descriptions
pub trait EnvironmentInfo {
    fn describe(&self, kind: TestKind) -> ResourceDescription;
}

/// Reads host metadata through sysinfo.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProvider;

impl EnvironmentInfo for SysinfoProvider {
    fn describe(&self, kind: TestKind) -> ResourceDescription {
        let detected = match kind {
            TestKind::Cpu => CpuInfo::detect().map(|info| info.description()),
            TestKind::Ram => RamInfo::detect().map(|info| info.description()),
            TestKind::Disk => DiskInfo::detect().map(|info| info.description()),
        };

        match detected {
            Ok(description) => {
                debug!(%kind, name = %description.name, "Detected resource");
                description
            }
            Err(err) => {
                warn!(%kind, error = %err, "Resource detection failed, using placeholder");
                ResourceDescription::unknown()
            }
        }
    }
}

/// Used when detection is disabled in config.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableProvider;

impl EnvironmentInfo for UnavailableProvider {
    fn describe(&self, _kind: TestKind) -> ResourceDescription {
        ResourceDescription::unknown()
    }
}

/// Pick the provider the config asks for.
pub fn provider(detect: bool) -> Box<dyn EnvironmentInfo> {
    if detect {
        Box::new(SysinfoProvider)
    } else {
        Box::new(UnavailableProvider)
    }
}

pub(crate) fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}
