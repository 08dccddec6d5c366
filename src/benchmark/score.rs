//! Simulated score model
//!
//! Scores are simulated, not measured. Two modes are supported:
//! - `uniform_random`: a uniform draw from the kind's inclusive range
//! - `elapsed_formula`: `numerator / elapsed_secs`, capped

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TestKind;

/// Note attached wherever a score is shown or exported.
pub const SIMULATED_NOTE: &str = "Simulated score: no hardware was measured.";

/// How a finished run turns into a score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[default]
    UniformRandom,
    ElapsedFormula,
}

/// Per-kind score parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreProfile {
    /// Lower bound for `uniform_random` (inclusive)
    pub min: i64,
    /// Upper bound for `uniform_random` (inclusive)
    pub max: i64,
    /// Dividend for `elapsed_formula`
    pub numerator: i64,
}

impl ScoreProfile {
    pub fn cpu() -> Self {
        Self {
            min: 5000,
            max: 6500,
            numerator: 250_000,
        }
    }

    pub fn ram() -> Self {
        Self {
            min: 2000,
            max: 3000,
            numerator: 100_000,
        }
    }

    pub fn disk() -> Self {
        Self {
            min: 4000,
            max: 5000,
            numerator: 25_000,
        }
    }
}

/// Produces the simulated score for a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreModel {
    pub mode: ScoringMode,
    pub cpu: ScoreProfile,
    pub ram: ScoreProfile,
    pub disk: ScoreProfile,
    /// Upper bound for `elapsed_formula` scores
    pub cap: i64,
}

impl Default for ScoreModel {
    fn default() -> Self {
        Self {
            mode: ScoringMode::default(),
            cpu: ScoreProfile::cpu(),
            ram: ScoreProfile::ram(),
            disk: ScoreProfile::disk(),
            cap: 1_000_000,
        }
    }
}

impl ScoreModel {
    pub fn profile(&self, kind: TestKind) -> &ScoreProfile {
        match kind {
            TestKind::Cpu => &self.cpu,
            TestKind::Ram => &self.ram,
            TestKind::Disk => &self.disk,
        }
    }

    pub fn score<R: Rng + ?Sized>(&self, kind: TestKind, elapsed: Duration, rng: &mut R) -> i64 {
        let profile = self.profile(kind);
        match self.mode {
            ScoringMode::UniformRandom => {
                if profile.min >= profile.max {
                    profile.min
                } else {
                    rng.gen_range(profile.min..=profile.max)
                }
            }
            ScoringMode::ElapsedFormula => elapsed_score(profile.numerator, elapsed, self.cap),
        }
    }
}

/// `numerator / elapsed_secs`, treating anything under a second as one second.
pub fn elapsed_score(numerator: i64, elapsed: Duration, cap: i64) -> i64 {
    let secs = elapsed.as_secs_f64().max(1.0);
    let raw = (numerator as f64 / secs).round();
    if !raw.is_finite() {
        return cap;
    }
    (raw as i64).clamp(0, cap.max(0))
}
