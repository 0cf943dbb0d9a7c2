use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    #[serde(default)]
    pub developer: Developer,
    pub http: Http,
    pub log: Log,
    pub token_store: TokenStore,
    pub user: User,
}

#[derive(Deserialize)]
pub struct Auth {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
}

fn default_access_ttl_secs() -> u64 {
    60 * 60
}

fn default_refresh_ttl_secs() -> u64 {
    365 * 24 * 60 * 60
}

// secrets stay out of the startup log
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Developer {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    #[serde(default)]
    pub tls: bool,
    #[serde(default)]
    pub cert_path: String,
    #[serde(default)]
    pub key_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenStore {
    pub backend: String, // "redis" or "memory"
    #[serde(default)]
    pub redis_dsn: String,
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub backend: String, // "mysql" or "memory"
    #[serde(default)]
    pub mysql_dsn: String,
    /// Identities loaded into the memory backend at startup.
    #[serde(default)]
    pub seed: Vec<SeedUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub id: String,
    pub mobile: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Loads the TOML file, then lets `COURSEHUB_<SECTION>__<KEY>` variables
/// override it (e.g. `COURSEHUB_AUTH__REFRESH_SECRET`).
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    load(path.unwrap_or(SETTINGS_PATH), env_overrides())
}

fn env_overrides() -> Environment {
    Environment::with_prefix("COURSEHUB")
        .prefix_separator("_")
        .separator("__")
}

fn load(path: &str, env: Environment) -> Result<Settings> {
    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(env)
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
