use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    AlertRuleConfig, AlertSettings, DataSettings, ForecastSettings, ScenarioSettings, Settings,
    Severity, StatementSettings,
};

/// Prefix of environment variables that override file values,
/// e.g. `HOTEL_KPI__FORECAST__HORIZON=14`.
pub const ENV_PREFIX: &str = "HOTEL_KPI";

/// Loads the application configuration from `path`.
///
/// This function is the primary entry point for this crate. It reads the TOML
/// file (which may be absent), applies `HOTEL_KPI__*` environment overrides,
/// deserializes the result into our strongly-typed `Settings` struct and
/// validates it.
pub fn load_config(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    load_config_from(path.as_ref(), environment())
}

/// The `HOTEL_KPI__SECTION__KEY` environment source.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load_config_from(path: &Path, env: config::Environment) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(path = %path.display(), rules = settings.alerts.rules.len(), "Configuration loaded.");
    Ok(settings)
}

impl Settings {
    /// Rejects values that deserialize fine but cannot drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast.horizon == 0 {
            return Err(ConfigError::ValidationError(
                "forecast.horizon must be at least 1 day".to_string(),
            ));
        }
        if let Some(index) = self.alerts.rules.iter().position(|r| r.metric.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "alerts.rules[{index}] has an empty metric name"
            )));
        }
        let bindings = &self.statements.bindings;
        if bindings.current_liability_lines.is_empty() || bindings.current_asset_lines.is_empty() {
            return Err(ConfigError::ValidationError(
                "statements.bindings needs current asset and current liability lines".to_string(),
            ));
        }
        Ok(())
    }
}
