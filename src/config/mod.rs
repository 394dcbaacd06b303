//! Tries to create an `AppConfig` from config files and the environment.
//! Sources are layered with `figment`: `base.toml`, then the environment specific file,
//! then `APP_` prefixed variables and finally the `GOOGLE_*` service account variables.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod structs;

use std::{path::Path, sync::OnceLock};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use structs::{AppConfig, Environment, NetConfig, SheetsConfig};

/// Service account variables, read as `GOOGLE_{KEY}` and nested under `sheets_config`.
const GOOGLE_KEYS: [&str; 4] = ["client_email", "private_key", "project_id", "sheet_id"];

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<12} - Initializing the configuration",
            "get_or_init_config"
        );
        let base_path = std::env::current_dir().expect("Failed to determine the current DIR.");
        let config_dir = base_path.join("config");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .unwrap_or_else(|er| panic!("Fatal Error: Parsing APP_ENVIRONMENT: {er}"));

        AppConfig::load(&config_dir, environment)
            .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}

impl AppConfig {
    /// Layers every configuration source in order of precedence (last one wins).
    pub fn figment(config_dir: &Path, environment: Environment) -> Figment {
        Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(
                config_dir.join(environment.config_file_name()),
            ))
            // e.g. `APP_NET_CONFIG__APP_PORT=8000` -> `net_config.app_port`
            .merge(Env::prefixed("APP_").split("__"))
            .merge(
                Env::prefixed("GOOGLE_")
                    .only(&GOOGLE_KEYS)
                    .map(|key| format!("sheets_config.{key}").into()),
            )
    }

    pub fn load(config_dir: &Path, environment: Environment) -> ConfigResult<Self> {
        let config = Self::figment(config_dir, environment).extract()?;
        Ok(config)
    }
}
