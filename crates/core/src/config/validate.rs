use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - TMDB section exists (enforced by serde) and has an API key
/// - Aggregator concurrency and deadline are not 0
/// - TMDB request timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // TMDB validation
    if config.tmdb.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.api_key cannot be empty".to_string(),
        ));
    }
    if config.tmdb.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "tmdb.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Aggregator validation
    if config.aggregator.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "aggregator.concurrency cannot be 0".to_string(),
        ));
    }
    if config.aggregator.deadline_secs == 0 {
        return Err(ConfigError::ValidationError(
            "aggregator.deadline_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::AggregatorConfig;
    use crate::catalog::TmdbConfig;
    use crate::config::OutputConfig;

    fn valid_config() -> Config {
        Config {
            tmdb: TmdbConfig::new("test-key"),
            aggregator: AggregatorConfig::default(),
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = valid_config();
        config.tmdb.api_key = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = valid_config();
        config.tmdb.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_concurrency_fails() {
        let mut config = valid_config();
        config.aggregator.concurrency = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("aggregator.concurrency"));
    }

    #[test]
    fn test_validate_zero_deadline_fails() {
        let mut config = valid_config();
        config.aggregator.deadline_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
