use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment variables overriding file settings,
/// e.g. `TOPACTORS_TMDB__API_KEY` or `TOPACTORS_AGGREGATOR__CONCURRENCY`.
pub const ENV_PREFIX: &str = "TOPACTORS_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[tmdb]
api_key = "abc"

[aggregator]
concurrency = 3
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.aggregator.concurrency, 3);
    }

    #[test]
    fn test_load_config_from_str_missing_tmdb() {
        let toml = r#"
[aggregator]
concurrency = 3
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[tmdb]
api_key = "from-file"
top_rated_limit = 50

[aggregator]
deadline_secs = 30
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.tmdb.top_rated_limit, 50);
        assert_eq!(config.aggregator.deadline_secs, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[tmdb]
api_key = "from-file"

[aggregator]
concurrency = 4
"#,
            )?;
            jail.set_env("TOPACTORS_TMDB__API_KEY", "from-env");
            jail.set_env("TOPACTORS_AGGREGATOR__CONCURRENCY", "16");

            let config = load_config(Path::new("config.toml")).expect("config should load");
            assert_eq!(config.tmdb.api_key, "from-env");
            assert_eq!(config.aggregator.concurrency, 16);
            assert_eq!(config.aggregator.deadline_secs, 600);
            Ok(())
        });
    }
}
