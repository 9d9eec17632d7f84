//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Predictive model configuration.
    pub model: ModelConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// JWT configuration as loaded from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in minutes.
    #[serde(default = "default_access_token_minutes")]
    pub access_token_expires_minutes: i64,
    /// Refresh token expiration in days.
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_expires_days: i64,
}

fn default_access_token_minutes() -> i64 {
    30
}

fn default_refresh_token_days() -> i64 {
    7
}

/// Predictive model configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the net-sales model coefficients file.
    #[serde(default = "default_model_path")]
    pub path: String,
}

fn default_model_path() -> String {
    "net_sales_model.json".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FORECOURT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
