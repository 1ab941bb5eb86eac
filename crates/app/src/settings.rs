//! Application settings.
//!
//! Read from an optional `config` file (TOML) merged with
//! `SALVADANAIO_`-prefixed environment variables, e.g.
//! `SALVADANAIO_SERVER__PORT=3000`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter, e.g. "info" or "debug".
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

/// Database backing the server.
///
/// `database = "memory"` for an in-memory store, or
/// `database = { sqlite = "./salvadanaio.db" }` for a file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("SALVADANAIO").separator("__"))
            .build()?
            .try_deserialize()
    }
}
