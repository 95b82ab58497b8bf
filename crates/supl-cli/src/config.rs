//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/supl/config.toml` by default:
//!
//! ```toml
//! debug = false
//!
//! [settings]
//! include = ["3A", "4B"]
//! exclude = []
//! day_end_period = 6
//! absence_skip = ["KOP", "HRN", "HEI"]
//!
//! [[periods]]
//! name = "1"
//! start = "07:55"
//! end = "08:40"
//! ```
//!
//! Without `[[periods]]` the standard eight-period day is used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use supl_core::period::{DEFAULT_TIME_FORMAT, Period, PeriodCatalogue, parse_time};
use supl_core::settings::EngineSettings;

use crate::error::{CliError, CliResult};

/// Configuration for the supl CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Debug mode.
    pub debug: bool,

    /// Engine settings: class filter, day end, absence denylist.
    pub settings: EngineSettings,

    /// Custom period catalogue; empty means the standard day.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<PeriodSettings>,
}

/// One period of a custom catalogue, times as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSettings {
    pub name: String,
    pub start: String,
    pub end: String,
}

impl CliConfig {
    /// Loads configuration from the default path, or defaults if it does not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("supl")
    }

    /// Builds the period catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is not `HH:MM` or the periods overlap.
    pub fn catalogue(&self) -> CliResult<PeriodCatalogue> {
        if self.periods.is_empty() {
            return Ok(PeriodCatalogue::standard());
        }

        let periods = self
            .periods
            .iter()
            .map(|p| {
                Ok(Period::new(
                    p.name.as_str(),
                    parse_time(&p.start, DEFAULT_TIME_FORMAT)?,
                    parse_time(&p.end, DEFAULT_TIME_FORMAT)?,
                ))
            })
            .collect::<CliResult<Vec<_>>>()?;

        Ok(PeriodCatalogue::new(periods)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");
        let config = CliConfig::load_from(file.path()).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.settings.absence_skip, vec!["KOP", "HRN", "HEI"]);
        assert_eq!(config.catalogue().unwrap(), PeriodCatalogue::standard());
    }

    #[test]
    fn loads_settings_section() {
        let file = write_config(
            r#"
debug = true

[settings]
include = ["3A"]
exclude = ["4B"]
day_end_hour = 5
absence_skip = ["XYZ"]
"#,
        );

        let config = CliConfig::load_from(file.path()).unwrap();

        assert!(config.debug);
        assert_eq!(config.settings.include, vec!["3A"]);
        assert_eq!(config.settings.exclude, vec!["4B"]);
        assert_eq!(config.settings.day_end_period, Some(5));
        assert_eq!(config.settings.absence_skip, vec!["XYZ"]);
    }

    #[test]
    fn custom_periods() {
        let file = write_config(
            r#"
[[periods]]
name = "1"
start = "08:00"
end = "08:45"

[[periods]]
name = "2"
start = "08:55"
end = "09:40"
"#,
        );

        let catalogue = CliConfig::load_from(file.path())
            .unwrap()
            .catalogue()
            .unwrap();

        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.periods()[1].name, "2");
    }

    #[test]
    fn overlapping_periods_are_rejected() {
        let config = CliConfig {
            periods: vec![
                PeriodSettings {
                    name: "1".to_string(),
                    start: "08:00".to_string(),
                    end: "09:00".to_string(),
                },
                PeriodSettings {
                    name: "2".to_string(),
                    start: "08:30".to_string(),
                    end: "09:30".to_string(),
                },
            ],
            ..CliConfig::default()
        };
        assert!(matches!(config.catalogue(), Err(CliError::Core(_))));
    }

    #[test]
    fn malformed_time_is_rejected() {
        let config = CliConfig {
            periods: vec![PeriodSettings {
                name: "1".to_string(),
                start: "8h".to_string(),
                end: "09:00".to_string(),
            }],
            ..CliConfig::default()
        };
        assert!(config.catalogue().is_err());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let file = write_config("[settings\ninclude = 3");
        let err = CliConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn missing_file_is_config_error_naming_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = CliConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CliError::Config(ref msg) if msg.contains("absent.toml")));
    }

    #[test]
    fn default_path_ends_with_supl() {
        let path = CliConfig::default_path();
        assert!(path.ends_with("supl/config.toml"));
    }
}
