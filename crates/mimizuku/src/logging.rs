//! tracing-subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, LoggingConfig};

/// Filter from the configured directive, else `RUST_LOG`, else the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    let filter = match &config.filter {
        Some(directive) => EnvFilter::try_new(directive),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level)),
    };
    filter.map_err(|err| ConfigError::Invalid(format!("logging filter: {}", err)))
}

/// Install the global fmt subscriber; fails if one is already installed
pub fn init(config: &LoggingConfig) -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_ansi(config.ansi)
        .with_target(config.with_target)
        .try_init()
        .map_err(|err| ConfigError::Logging(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_filter_wins() {
        let config = LoggingConfig {
            filter: Some("mimizuku_formats=debug,warn".to_string()),
            ..LoggingConfig::default()
        };
        let filter = env_filter(&config).unwrap();
        assert!(filter.to_string().contains("mimizuku_formats=debug"));
    }

    #[test]
    fn test_second_init_is_rejected() {
        let config = LoggingConfig {
            filter: Some("warn".to_string()),
            ..LoggingConfig::default()
        };
        let _ = init(&config);
        assert!(matches!(init(&config), Err(ConfigError::Logging(_))));
    }
}
