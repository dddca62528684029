use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scripts: ScriptsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address; empty means every interface.
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: String::new(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for Driver {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Driver::Postgres),
            "memory" => Ok(Driver::Memory),
            other => Err(anyhow!("unsupported database driver: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub driver: Driver,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub dbname: String,
    /// Full connection URL; takes precedence over the individual parts.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            protocol: default_protocol(),
            username: String::new(),
            password: String::new(),
            host: default_host(),
            dbname: String::new(),
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: default_run_migrations(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Append-only log file, written alongside stdout.
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: default_log_file(), format: LogFormat::default(), filter: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptsConfig {
    #[serde(default = "default_scripts_dir")]
    pub dir: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self { dir: default_scripts_dir() }
    }
}

/// Command-line values layered on top of the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dbdriver: Option<String>,
    pub dbprotocol: Option<String>,
    pub dbusername: Option<String>,
    pub dbpassword: Option<String>,
    pub dbhost: Option<String>,
    pub dbname: Option<String>,
    pub address: Option<String>,
    pub port: Option<u16>,
    pub scripts_dir: Option<String>,
    pub log_file: Option<String>,
}

fn default_port() -> u16 { 80 }
fn default_protocol() -> String { "postgres".into() }
fn default_host() -> String { "localhost".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_run_migrations() -> bool { true }
fn default_log_file() -> String { "sys.log".into() }
fn default_scripts_dir() -> String { "sql".into() }

/// Load from `path`, then `CONFIG_PATH`, then `config.yml`.
/// A missing file is not an error: defaults are returned.
pub fn load(path: Option<&str>) -> Result<AppConfig> {
    let path = match path {
        Some(p) => p.to_string(),
        None => std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
    };
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("couldn't read config file {path}: {e}"))?;
    if path.ends_with(".toml") {
        parse_toml(&content)
    } else {
        parse_yaml(&content)
    }
}

pub fn parse_yaml(content: &str) -> Result<AppConfig> {
    // an empty document deserializes to unit, not to an empty map
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| anyhow!("couldn't parse config file: {e}"))
}

pub fn parse_toml(content: &str) -> Result<AppConfig> {
    toml::from_str(content).map_err(|e| anyhow!("couldn't parse config file: {e}"))
}

impl AppConfig {
    pub fn apply_overrides(&mut self, o: Overrides) -> Result<()> {
        if let Some(d) = o.dbdriver { self.database.driver = d.parse()?; }
        if let Some(p) = o.dbprotocol { self.database.protocol = p; }
        if let Some(u) = o.dbusername { self.database.username = u; }
        if let Some(p) = o.dbpassword { self.database.password = p; }
        if let Some(h) = o.dbhost { self.database.host = h; }
        if let Some(n) = o.dbname { self.database.dbname = n; }
        if let Some(a) = o.address { self.server.address = a; }
        if let Some(p) = o.port { self.server.port = p; }
        if let Some(s) = o.scripts_dir { self.scripts.dir = s; }
        if let Some(f) = o.log_file { self.logging.file = f; }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        if self.scripts.dir.trim().is_empty() {
            return Err(anyhow!("scripts.dir must not be empty"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        self.address = self.address.trim().to_string();
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    /// `address:port`, binding every interface when no address is set.
    pub fn bind_addr(&self) -> String {
        let host = if self.address.is_empty() { "0.0.0.0" } else { self.address.as_str() };
        format!("{}:{}", host, self.port)
    }
}

impl DatabaseConfig {
    /// Falls back to `DATABASE_URL` when neither a URL nor a database name was configured.
    pub fn normalize_from_env(&mut self) {
        let has_url = self.url.as_deref().is_some_and(|u| !u.trim().is_empty());
        if !has_url && self.dbname.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = Some(url);
            }
        }
    }

    pub fn connection_url(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => format!(
                "{}://{}:{}@{}/{}",
                self.protocol, self.username, self.password, self.host, self.dbname
            ),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.driver == Driver::Memory {
            return Ok(());
        }
        let has_url = self.url.as_deref().is_some_and(|u| !u.trim().is_empty());
        if !has_url && self.dbname.trim().is_empty() {
            return Err(anyhow!("database name is empty; set database.dbname, database.url, --dbname or DATABASE_URL"));
        }
        let lower = self.connection_url().to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}
