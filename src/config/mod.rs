//! Builds an `AppConfig` from config files layered with environment variables.
//! Layers, last one wins:
//! - `config/base.toml`
//! - `config/{APP_ENVIRONMENT}.toml`
//! - `APP_`-prefixed environment variables, using `__` to separate nested keys
//!   (e.g. `APP_NET_CONFIG__APP_PORT=5000`)
//! - `DATABASE_URL` and `PORT`, if set

mod error;
mod types;

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, DbConfig, Environment, NetConfig, SslRequire, UiConfig};

/// Reads the configuration for the environment named by `APP_ENVIRONMENT` (defaults to `local`)
/// from the `config` directory in the current working dir.
pub fn load_config() -> ConfigResult<AppConfig> {
    info!("{:<20} - Initializing the configuration", "load_config");
    let config_dir = std::env::current_dir()?.join("config");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;

    AppConfig::from_dir(&config_dir, &environment)
}

impl AppConfig {
    /// The layered provider this configuration is extracted from.
    pub fn figment(config_dir: &Path, environment: &Environment) -> Figment {
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            .merge(Env::prefixed("APP_").split("__"))
    }

    pub fn from_dir(config_dir: &Path, environment: &Environment) -> ConfigResult<Self> {
        let mut config: AppConfig = Self::figment(config_dir, environment)
            .extract()
            .map_err(Box::new)?;

        // Hosting platforms hand these two out as plain env vars.
        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            config.db_config.override_from_url(&database_url)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.net_config.app_port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?;
        }

        Ok(config)
    }
}
