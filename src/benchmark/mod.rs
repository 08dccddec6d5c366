//! Simulated benchmark tests
//!
//! A test never measures anything: it waits a configured duration, shows a
//! countdown, and produces a simulated score. See [`score`] for how scores
//! are produced, [`runner`] for the deferred task and [`view`] for the
//! per-kind state machine.

pub mod runner;
pub mod score;
pub mod view;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of simulated test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestKind {
    Cpu,
    Ram,
    Disk,
}

impl TestKind {
    pub const ALL: [TestKind; 3] = [TestKind::Cpu, TestKind::Ram, TestKind::Disk];

    /// Label used for display and for the persisted `test_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::Cpu => "CPU",
            TestKind::Ram => "RAM",
            TestKind::Disk => "DISK",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TestKind::Cpu => "CPU Test",
            TestKind::Ram => "RAM Test",
            TestKind::Disk => "Disk Test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTestKindError(pub String);

impl fmt::Display for ParseTestKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown test kind '{}' (expected CPU, RAM or DISK)", self.0)
    }
}

impl std::error::Error for ParseTestKindError {}

impl FromStr for TestKind {
    type Err = ParseTestKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CPU" => Ok(TestKind::Cpu),
            "RAM" => Ok(TestKind::Ram),
            "DISK" => Ok(TestKind::Disk),
            _ => Err(ParseTestKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parses_case_insensitively() {
        assert_eq!("cpu".parse::<TestKind>().unwrap(), TestKind::Cpu);
        assert_eq!(" Ram ".parse::<TestKind>().unwrap(), TestKind::Ram);
        assert_eq!("DISK".parse::<TestKind>().unwrap(), TestKind::Disk);
        assert!("gpu".parse::<TestKind>().is_err());
    }

    #[test]
    fn test_kind_display_matches_storage_label() {
        for kind in TestKind::ALL {
            assert_eq!(kind.to_string().parse::<TestKind>().unwrap(), kind);
        }
        assert_eq!(TestKind::Disk.to_string(), "DISK");
    }
}
