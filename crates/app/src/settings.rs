//! Handles settings for the application. Configuration is read from
//! `settings.toml` (or the file passed with `--config`) and can be overridden
//! with `FINTRACK__SECTION__KEY` environment variables.
//!
//! See `settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Identity {
    pub url: String,
    pub anon_key: String,
    pub service_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    pub identity: Identity,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_prefix() -> String {
    "/fintrack".to_string()
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("FINTRACK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
