//! Lab configuration.
//!
//! [`LabConfig`] holds the simulated delays, logging and export settings.
//! Every section uses `#[serde(default)]`, so partial files are fine.
//!
//! [`ConfigManager::load`] layers built-in defaults, `./dlab.toml`,
//! `~/.config/dlab/config.toml` and `DLAB_*` environment variables
//! (`DLAB_TIMING__INSTANT=true`, `DLAB_LOGGING__LEVEL=debug`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

/// Artificial delays of the simulated runs, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub detector_ms: u64,
    pub editor_ms: u64,
    pub console_ms: u64,
    /// Gap before each follow-up batch of a console command.
    pub console_follow_up_ms: u64,
    pub walkthrough_ms: u64,
    /// Settle every run immediately.
    pub instant: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            detector_ms: 2000,
            editor_ms: 1500,
            console_ms: 1000,
            console_follow_up_ms: 1000,
            walkthrough_ms: 2000,
            instant: false,
        }
    }
}

impl TimingConfig {
    fn delay(&self, ms: u64) -> Duration {
        if self.instant {
            Duration::ZERO
        } else {
            Duration::from_millis(ms)
        }
    }

    pub fn detector(&self) -> Duration {
        self.delay(self.detector_ms)
    }

    pub fn editor(&self) -> Duration {
        self.delay(self.editor_ms)
    }

    pub fn console(&self) -> Duration {
        self.delay(self.console_ms)
    }

    pub fn console_follow_up(&self) -> Duration {
        self.delay(self.console_follow_up_ms)
    }

    pub fn walkthrough(&self) -> Duration {
        self.delay(self.walkthrough_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `DLAB_LOG` is unset.
    pub level: String,
    /// Directory for hourly JSON log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where exported files are written.
    pub dir: PathBuf,
    /// File name of the console log export.
    pub console_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            console_file: "debug-logs.txt".to_string(),
        }
    }
}

impl LabConfig {
    /// `~/.config/dlab`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dlab"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Read a TOML file directly, without other layers.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Layered configuration loading.
pub struct ConfigManager {
    config: LabConfig,
}

impl ConfigManager {
    /// Load from the default locations plus the environment.
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Like [`ConfigManager::load`], with an explicit file taking precedence
    /// over the default locations. The explicit file must exist.
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&LabConfig::default())?)
            .add_source(File::with_name("dlab").required(false));

        if let Some(path) = LabConfig::config_path() {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("DLAB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<LabConfig>()?;

        tracing::debug!(?config, "configuration loaded");
        Ok(Self { config })
    }

    pub fn into_config(self) -> LabConfig {
        self.config
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            config: LabConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = LabConfig::default();
        assert_eq!(config.timing.detector(), Duration::from_millis(2000));
        assert_eq!(config.timing.editor(), Duration::from_millis(1500));
        assert_eq!(config.timing.console(), Duration::from_millis(1000));
        assert_eq!(config.timing.walkthrough(), Duration::from_millis(2000));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.export.console_file, "debug-logs.txt");
    }

    #[test]
    fn test_instant_zeroes_every_delay() {
        let timing = TimingConfig {
            instant: true,
            ..TimingConfig::default()
        };
        assert_eq!(timing.detector(), Duration::ZERO);
        assert_eq!(timing.console_follow_up(), Duration::ZERO);
    }

    #[test]
    fn test_partial_config_parsing() {
        let toml = r#"
            [timing]
            console_ms = 250

            [logging]
            level = "debug"
        "#;

        let config: LabConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.timing.console_ms, 250);
        assert_eq!(config.logging.level, "debug");
        // Defaults for unset values
        assert_eq!(config.timing.detector_ms, 2000);
        assert!(config.logging.log_dir.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = LabConfig::default();
        config.timing.editor_ms = 10;
        config.export.dir = PathBuf::from("/tmp/exports");
        config.save_to(&path).unwrap();

        let loaded = LabConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_manager_explicit_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lab.toml");
        std::fs::write(&path, "[timing]\nwalkthrough_ms = 5\n").unwrap();

        let config = ConfigManager::load_with(Some(&path)).unwrap().into_config();
        assert_eq!(config.timing.walkthrough_ms, 5);
        assert_eq!(config.timing.editor_ms, 1500);
    }

    #[test]
    fn test_manager_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(ConfigManager::load_with(Some(&missing)).is_err());
    }
}
