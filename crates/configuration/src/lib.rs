use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnnualTargets, ApiConfig, AsOfPolicy, Config, MockConfig, QuarterTargets, ServerConfig,
    SheetsConfig, SourceKind, Targets,
};

/// Loads the application configuration from `config.toml`, falling back to
/// built-in defaults for anything the file leaves out.
///
/// Environment variables prefixed with `QUOTA__` override file values
/// (e.g. `QUOTA__SERVER__PORT=8080`).
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // The file is optional: a bare checkout runs on defaults (mock source).
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("QUOTA").separator("__"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if !(1..=12).contains(&config.as_of.fallback_month) {
        return Err(ConfigError::ValidationError(format!(
            "as_of.fallback_month must be 1-12, got {}",
            config.as_of.fallback_month
        )));
    }
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must be non-zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn out_of_range_fallback_month_is_rejected() {
        let mut config = Config::default();
        config.as_of.fallback_month = 13;
        assert!(validate(&config).is_err());
    }
}
