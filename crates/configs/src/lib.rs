//! Application configuration.
//!
//! Values come from an optional `config.toml` (path overridable through
//! `CONFIG_PATH`), then process environment variables override them.

use std::path::Path;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
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
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present (defaults otherwise), environment on top, then validation.
    pub fn load() -> Result<Self> {
        let path = config_path();
        // 没有配置文件时使用默认值，仍允许环境变量覆盖
        let mut cfg = if Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override values from environment variables, read through `lookup`.
    ///
    /// `DATABASE_URL` (or the legacy `MONGODB_URI`), `SERVER_HOST`, `PORT` / `SERVER_PORT`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // DATABASE_URL wins over the legacy name
        if let Some(url) = non_empty("DATABASE_URL").or_else(|| non_empty("MONGODB_URI")) {
            self.database.url = url;
        }
        if let Some(host) = non_empty("SERVER_HOST") {
            self.server.host = host;
        }
        // PORT 优先（常见 PaaS 约定），其次 SERVER_PORT；非法端口直接报错
        if let Some(port) = non_empty("PORT").or_else(|| non_empty("SERVER_PORT")) {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow!("invalid port {port:?}: {e}"))?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        // 0 means "let tokio decide"
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("server.request_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or through DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive numbers of seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_fills_missing_sections_with_defaults() {
        let cfg = parse("[database]\nurl = \"postgres://localhost/activities\"\n").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.request_timeout_secs, 30);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.min_connections, 2);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = parse("[server]\nport = 9000\n").unwrap();
        cfg.apply_env(env(&[("PORT", "3000"), ("DATABASE_URL", "postgres://db/x")])).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.database.url, "postgres://db/x");
    }

    #[test]
    fn legacy_mongodb_uri_is_accepted_as_fallback() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[("MONGODB_URI", "postgres://legacy/x")])).unwrap();
        assert_eq!(cfg.database.url, "postgres://legacy/x");

        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[("MONGODB_URI", "postgres://legacy/x"), ("DATABASE_URL", "postgres://new/x")])).unwrap();
        assert_eq!(cfg.database.url, "postgres://new/x");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(env(&[("PORT", "http")])).is_err());
        assert!(cfg.apply_env(env(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn validation_requires_database_url() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_and_validate().is_err());
        cfg.database.url = "sqlite::memory:".into();
        assert!(cfg.normalize_and_validate().is_ok());
    }

    #[test]
    fn validation_rejects_unknown_scheme_and_bad_pool() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "mongodb://localhost".into();
        assert!(cfg.normalize_and_validate().is_err());

        cfg.database.url = "postgres://localhost/db".into();
        cfg.database.min_connections = 5;
        cfg.database.max_connections = 2;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn normalize_restores_blank_host_and_drops_zero_threads() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://localhost/db".into();
        cfg.server.host = "  ".into();
        cfg.server.worker_threads = Some(0);
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, None);
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8080");
    }
}
