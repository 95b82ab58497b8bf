//! Configuration commands.

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &CliConfig) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", CliConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &CliConfig) -> CliResult<()> {
    let catalogue = config.catalogue()?;

    let overlap: Vec<&String> = config
        .settings
        .include
        .iter()
        .filter(|c| config.settings.exclude.contains(*c))
        .collect();
    if !overlap.is_empty() {
        println!(
            "note: {:?} are both included and excluded; include wins",
            overlap
        );
    }

    if let Some(last) = config.settings.day_end_period {
        if last == 0 || last as usize > catalogue.len() {
            return Err(CliError::Config(format!(
                "day_end_period {} is outside the {} periods of the day",
                last,
                catalogue.len()
            )));
        }
    }

    println!("Configuration is valid ({} periods).", catalogue.len());
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> CliResult<()> {
    let config_path = CliConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use supl_core::settings::EngineSettings;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&CliConfig::default()).is_ok());
    }

    #[test]
    fn day_end_outside_catalogue_is_invalid() {
        let config = CliConfig {
            settings: EngineSettings::default().with_day_end_period(Some(9)),
            ..CliConfig::default()
        };
        assert!(matches!(validate(&config), Err(CliError::Config(_))));
    }
}
