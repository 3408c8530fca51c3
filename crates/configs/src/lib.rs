use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub price_service: PriceServiceConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080, worker_threads: Some(4) }
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
    #[serde(default = "default_true")]
    pub run_migrations: bool,
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
            run_migrations: true,
        }
    }
}

/// Remote price-calculation dependency.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceServiceConfig {
    /// Base URL the `/prices/calculate` path is appended to, e.g. `http://price-service:8080/api/v1`.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_price_timeout")]
    pub timeout_secs: u64,
}

impl Default for PriceServiceConfig {
    fn default() -> Self {
        Self { base_url: String::new(), timeout_secs: default_price_timeout() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true, path: default_metrics_path(), service_name: default_service_name() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::default() }
    }
}

fn default_max_connections() -> u32 { 25 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 300 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_price_timeout() -> u64 { 10 }
fn default_metrics_path() -> String { "/metrics".into() }
fn default_service_name() -> String { "sellerservice".into() }
fn default_log_level() -> String { "info".into() }
fn default_true() -> bool { true }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is missing, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env_overrides();
        self.server.normalize()?;
        self.database.validate()?;
        self.price_service.validate()?;
        self.metrics.normalize();
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        // An explicit DATABASE_URL always wins over the file
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = url;
            }
        }
        if let Some(port) = std::env::var("HTTP_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Ok(url) = std::env::var("PRICE_SERVICE_URL") {
            if !url.trim().is_empty() {
                self.price_service.base_url = url;
            }
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.logs.level = level;
            }
        }
        if let Some(enabled) = std::env::var("METRICS_ENABLED").ok().and_then(|v| v.parse::<bool>().ok()) {
            self.metrics.enabled = enabled;
        }
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
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

impl PriceServiceConfig {
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(anyhow!("price_service.base_url is empty; set it in config.toml or PRICE_SERVICE_URL"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!("price_service.base_url must start with http(s)"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("price_service.timeout_secs must be positive"));
        }
        Ok(())
    }
}

impl MetricsConfig {
    fn normalize(&mut self) {
        if !self.path.starts_with('/') {
            self.path = format!("/{}", self.path);
        }
        if self.service_name.trim().is_empty() {
            self.service_name = default_service_name();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> AppConfig {
        toml::from_str(src).expect("valid toml")
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg = parse(
            r#"
            [database]
            url = "postgres://u:p@localhost:5432/seller"

            [price_service]
            base_url = "http://localhost:8081/api/v1"
            "#,
        );
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.max_connections, 25);
        assert!(cfg.database.run_migrations);
        assert_eq!(cfg.price_service.timeout_secs, 10);
        assert!(cfg.metrics.enabled);
        assert_eq!(cfg.metrics.path, "/metrics");
        assert_eq!(cfg.logs.level, "info");
        assert_eq!(cfg.logs.format, LogFormat::Compact);
    }

    #[test]
    fn json_log_format_parses() {
        let cfg = parse(
            r#"
            [logs]
            level = "debug"
            format = "json"
            "#,
        );
        assert_eq!(cfg.logs.format, LogFormat::Json);
        assert_eq!(cfg.logs.level, "debug");
    }

    #[test]
    fn database_validation_rejects_bad_urls() {
        let mut db = DatabaseConfig::default();
        assert!(db.validate().is_err());
        db.url = "mysql://localhost/x".into();
        assert!(db.validate().is_err());
        db.url = "postgres://localhost/x".into();
        assert!(db.validate().is_ok());
        db.min_connections = 10;
        db.max_connections = 5;
        assert!(db.validate().is_err());
    }

    #[test]
    fn price_service_validation() {
        let mut p = PriceServiceConfig::default();
        assert!(p.validate().is_err());
        p.base_url = "price-service:8080".into();
        assert!(p.validate().is_err());
        p.base_url = "http://price-service:8080/api/v1".into();
        assert!(p.validate().is_ok());
        p.timeout_secs = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn server_normalize_fixes_worker_threads() {
        let mut s = ServerConfig { host: " ".into(), port: 9000, worker_threads: Some(0) };
        s.normalize().unwrap();
        assert_eq!(s.host, "0.0.0.0");
        assert_eq!(s.worker_threads, Some(4));
        s.port = 0;
        assert!(s.normalize().is_err());
    }

    #[test]
    fn metrics_path_gets_leading_slash() {
        let mut m = MetricsConfig { enabled: true, path: "metrics".into(), service_name: "".into() };
        m.normalize();
        assert_eq!(m.path, "/metrics");
        assert_eq!(m.service_name, "sellerservice");
    }
}
