//! Configuration management for quickbench
//!
//! Config file location:
//! - Linux: ~/.config/quickbench/config.toml
//! - macOS: ~/Library/Application Support/quickbench/config.toml
//! - Windows: %APPDATA%/quickbench/config.toml
//!
//! You can override the config location by setting `QUICKBENCH_CONFIG_PATH`.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::benchmark::runner::RunSettings;
use crate::benchmark::score::{ScoreModel, ScoreProfile, ScoringMode};
use crate::storage;

pub const CONFIG_PATH_ENV: &str = "QUICKBENCH_CONFIG_PATH";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Run timing and scoring mode
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Per-kind score parameters
    #[serde(default)]
    pub scores: ScoresConfig,

    /// Result store location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Report export defaults
    #[serde(default)]
    pub export: ExportConfig,

    /// Environment info detection
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Log verbosity and destination
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config in {}", config_path.display()))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, toml)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let proj_dirs = ProjectDirs::from("com", "quickbench", "quickbench")
            .context("Could not determine project directories")?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Create default config file if it doesn't exist
    pub fn init() -> Result<Self> {
        let config = Self::load()?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            config.save()?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.benchmark.duration_ms == 0 {
            anyhow::bail!("benchmark.duration_ms must be greater than zero");
        }
        if self.benchmark.tick_ms == 0 {
            anyhow::bail!("benchmark.tick_ms must be greater than zero");
        }
        for (label, profile) in [
            ("cpu", &self.scores.cpu),
            ("ram", &self.scores.ram),
            ("disk", &self.scores.disk),
        ] {
            if profile.min > profile.max {
                anyhow::bail!(
                    "scores.{label}: min ({}) is greater than max ({})",
                    profile.min,
                    profile.max
                );
            }
        }
        if self.scores.cap <= 0 {
            anyhow::bail!("scores.cap must be positive");
        }
        Ok(())
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            duration: Duration::from_millis(self.benchmark.duration_ms),
            tick: Duration::from_millis(self.benchmark.tick_ms),
        }
    }

    pub fn score_model(&self) -> ScoreModel {
        ScoreModel {
            mode: self.benchmark.scoring,
            cpu: self.scores.cpu,
            ram: self.scores.ram,
            disk: self.scores.disk,
            cap: self.scores.cap,
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match non_empty(self.storage.database_path.as_deref()) {
            Some(path) => Ok(PathBuf::from(path)),
            None => storage::default_database_path(),
        }
    }

    /// Directory reports are written to. Defaults to `<data_dir>/reports`.
    pub fn export_dir(&self) -> Result<PathBuf> {
        match non_empty(self.export.directory.as_deref()) {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(storage::default_data_dir()?.join("reports")),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match non_empty(self.logging.file.as_deref()) {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(storage::default_data_dir()?.join("quickbench.log")),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Benchmark settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// How long a simulated run lasts, in milliseconds
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// Countdown tick interval, in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// `uniform_random` or `elapsed_formula`
    #[serde(default)]
    pub scoring: ScoringMode,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            tick_ms: default_tick_ms(),
            scoring: ScoringMode::default(),
        }
    }
}

fn default_duration_ms() -> u64 {
    20_000
}

fn default_tick_ms() -> u64 {
    1_000
}

/// Score parameters per test kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoresConfig {
    /// Upper bound for `elapsed_formula` scores
    #[serde(default = "default_cap")]
    pub cap: i64,

    #[serde(default = "ScoreProfile::cpu")]
    pub cpu: ScoreProfile,

    #[serde(default = "ScoreProfile::ram")]
    pub ram: ScoreProfile,

    #[serde(default = "ScoreProfile::disk")]
    pub disk: ScoreProfile,
}

impl Default for ScoresConfig {
    fn default() -> Self {
        Self {
            cap: default_cap(),
            cpu: ScoreProfile::cpu(),
            ram: ScoreProfile::ram(),
            disk: ScoreProfile::disk(),
        }
    }
}

fn default_cap() -> i64 {
    1_000_000
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file path (defaults to the data directory)
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for exported reports (defaults to `<data_dir>/reports`)
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Query host metadata for the test view descriptions
    #[serde(default = "default_true")]
    pub detect: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            detect: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `QUICKBENCH_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file used while the terminal UI owns the screen
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.benchmark.duration_ms, 20_000);
        assert_eq!(config.benchmark.tick_ms, 1_000);
        assert_eq!(config.benchmark.scoring, ScoringMode::UniformRandom);
        assert_eq!(config.scores.cpu, ScoreProfile::cpu());
        assert_eq!(config.scores.disk.max, 5000);
        assert!(config.environment.detect);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());

        let settings = config.run_settings();
        assert_eq!(settings.duration, Duration::from_secs(20));
        assert_eq!(settings.tick, Duration::from_secs(1));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();

        assert!(toml.contains("duration_ms"));
        assert!(toml.contains("scoring = \"uniform_random\""));
        assert!(toml.contains("[scores.cpu]"));
        assert!(toml.contains("[environment]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            "[benchmark]\nduration_ms = 5000\nscoring = \"elapsed_formula\"\n\n[scores.ram]\nmin = 1\nmax = 2\nnumerator = 10\n",
        )
        .unwrap();

        assert_eq!(config.benchmark.duration_ms, 5000);
        assert_eq!(config.benchmark.tick_ms, 1_000);
        let model = config.score_model();
        assert_eq!(model.mode, ScoringMode::ElapsedFormula);
        assert_eq!(model.ram.numerator, 10);
        assert_eq!(model.cpu, ScoreProfile::cpu());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.benchmark.duration_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scores.cpu.min = 7000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.benchmark.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap().benchmark.duration_ms, 20_000);

        let mut config = Config::default();
        config.benchmark.duration_ms = 1234;
        config.storage.database_path = Some("/tmp/results.db".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.benchmark.duration_ms, 1234);
        assert_eq!(
            loaded.database_path().unwrap(),
            PathBuf::from("/tmp/results.db")
        );
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[benchmark]\ntick_ms = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
