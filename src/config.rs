//! Configuration module for AI Inventory.

use serde::Deserialize;
use std::path::Path;

use crate::{InventoryError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4002
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Whether the durable store is used at all.
    #[serde(default = "default_db_enabled")]
    pub enabled: bool,
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_enabled() -> bool {
    true
}

fn default_db_path() -> String {
    "data/ai-inventory.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: default_db_enabled(),
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/ai-inventory.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// News aggregation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// Feed URLs to aggregate.
    #[serde(default = "default_feeds")]
    pub feeds: Vec<String>,
    /// Interval between aggregation passes in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Number of newest articles kept per pass.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Summary used when a feed item carries none.
    #[serde(default = "default_summary_placeholder")]
    pub summary_placeholder: String,
    /// Maximum summary length in characters.
    #[serde(default = "default_max_summary_length")]
    pub max_summary_length: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_feeds() -> Vec<String> {
    vec![
        "https://venturebeat.com/category/ai/feed/".to_string(),
        "https://www.artificialintelligence-news.com/feed/".to_string(),
        "https://www.technologyreview.com/topic/artificial-intelligence/feed/".to_string(),
        "https://ai.googleblog.com/feeds/posts/default".to_string(),
    ]
}

fn default_refresh_interval() -> u64 {
    900 // 15 minutes
}

fn default_top_n() -> usize {
    20
}

fn default_summary_placeholder() -> String {
    "No summary available.".to_string()
}

fn default_max_summary_length() -> usize {
    10000
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            refresh_interval_secs: default_refresh_interval(),
            top_n: default_top_n(),
            summary_placeholder: default_summary_placeholder(),
            max_summary_length: default_max_summary_length(),
            max_feed_size_bytes: default_max_feed_size(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Weekly newsletter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterConfig {
    /// Send the weekly digest (Mondays 09:00 UTC).
    #[serde(default)]
    pub enabled: bool,
    /// Subject line of the digest.
    #[serde(default = "default_newsletter_subject")]
    pub subject: String,
}

fn default_newsletter_subject() -> String {
    "Weekly AI Inventory Updates".to_string()
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            subject: default_newsletter_subject(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// News aggregation configuration.
    #[serde(default)]
    pub news: NewsConfig,
    /// Weekly newsletter configuration.
    #[serde(default)]
    pub newsletter: NewsletterConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(InventoryError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| InventoryError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: Override the HTTP port
    /// - `AI_INVENTORY_DATABASE_PATH`: Override the SQLite database path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {:?}", port),
            }
        }

        if let Ok(path) = std::env::var("AI_INVENTORY_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.news.feeds.is_empty() {
            return Err(InventoryError::Config(
                "news.feeds must list at least one feed URL".to_string(),
            ));
        }

        for feed in &self.news.feeds {
            let parsed = url::Url::parse(feed)
                .map_err(|e| InventoryError::Config(format!("invalid feed URL {feed}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(InventoryError::Config(format!(
                    "unsupported feed URL scheme: {feed}"
                )));
            }
        }

        if self.news.refresh_interval_secs == 0 {
            return Err(InventoryError::Config(
                "news.refresh_interval_secs must be greater than zero".to_string(),
            ));
        }

        if self.news.top_n == 0 {
            return Err(InventoryError::Config(
                "news.top_n must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4002);
        assert!(config.server.cors_origins.is_empty());

        assert!(config.database.enabled);
        assert_eq!(config.database.path, "data/ai-inventory.db");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/ai-inventory.log");

        assert_eq!(config.news.feeds.len(), 4);
        assert_eq!(config.news.refresh_interval_secs, 900);
        assert_eq!(config.news.top_n, 20);
        assert_eq!(config.news.summary_placeholder, "No summary available.");
        assert_eq!(config.news.max_summary_length, 10000);
        assert_eq!(config.news.max_feed_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.news.connect_timeout_secs, 10);
        assert_eq!(config.news.read_timeout_secs, 20);
        assert_eq!(config.news.total_timeout_secs, 30);
        assert_eq!(config.news.max_redirects, 5);

        assert!(!config.newsletter.enabled);
        assert_eq!(config.newsletter.subject, "Weekly AI Inventory Updates");
    }

    #[test]
    fn test_parse_newsletter_section() {
        let config = Config::parse("[newsletter]\nenabled = true\n").unwrap();
        assert!(config.newsletter.enabled);
        assert_eq!(config.newsletter.subject, "Weekly AI Inventory Updates");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080
cors_origins = ["http://localhost:5173"]

[database]
enabled = false
path = "custom/news.db"

[logging]
level = "debug"
file = "custom/logs/app.log"

[news]
feeds = ["https://example.com/a.xml", "https://example.com/b.xml"]
refresh_interval_secs = 60
top_n = 10
summary_placeholder = "n/a"
max_summary_length = 300
max_feed_size_bytes = 1048576
connect_timeout_secs = 3
read_timeout_secs = 4
total_timeout_secs = 5
max_redirects = 2
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);

        assert!(!config.database.enabled);
        assert_eq!(config.database.path, "custom/news.db");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");

        assert_eq!(config.news.feeds.len(), 2);
        assert_eq!(config.news.refresh_interval_secs, 60);
        assert_eq!(config.news.top_n, 10);
        assert_eq!(config.news.summary_placeholder, "n/a");
        assert_eq!(config.news.max_summary_length, 300);
        assert_eq!(config.news.max_feed_size_bytes, 1048576);
        assert_eq!(config.news.connect_timeout_secs, 3);
        assert_eq!(config.news.read_timeout_secs, 4);
        assert_eq!(config.news.total_timeout_secs, 5);
        assert_eq!(config.news.max_redirects, 2);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000

[news]
top_n = 5
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.news.top_n, 5);

        // Defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.news.feeds.len(), 4);
        assert_eq!(config.news.refresh_interval_secs, 900);
        assert_eq!(config.database.path, "data/ai-inventory.db");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 4002);
        assert_eq!(config.news.top_n, 20);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(InventoryError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(InventoryError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9999\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9999);
    }

    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    // Both env vars are touched in a single test so parallel tests never race on them.
    #[test]
    fn test_apply_env_overrides() {
        let original_port = std::env::var("PORT").ok();
        let original_path = std::env::var("AI_INVENTORY_DATABASE_PATH").ok();

        std::env::set_var("PORT", "5050");
        std::env::set_var("AI_INVENTORY_DATABASE_PATH", "/tmp/news.db");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 5050);
        assert_eq!(config.database.path, "/tmp/news.db");

        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("AI_INVENTORY_DATABASE_PATH", "");
        let logs = Arc::new(Mutex::new(Vec::new()));
        let writer_logs = Arc::clone(&logs);
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || CapturedLog(Arc::clone(&writer_logs)))
            .finish();
        let mut config = Config::default();
        tracing::subscriber::with_default(subscriber, || config.apply_env_overrides());
        assert_eq!(config.server.port, 4002);
        assert_eq!(config.database.path, "data/ai-inventory.db");
        let logged = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"));
        assert!(logged.contains("Ignoring invalid PORT value: \"not-a-port\""));

        match original_port {
            Some(val) => std::env::set_var("PORT", val),
            None => std::env::remove_var("PORT"),
        }
        match original_path {
            Some(val) => std::env::set_var("AI_INVENTORY_DATABASE_PATH", val),
            None => std::env::remove_var("AI_INVENTORY_DATABASE_PATH"),
        }
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_feeds() {
        let mut config = Config::default();
        config.news.feeds.clear();

        let result = config.validate();
        if let Err(InventoryError::Config(msg)) = result {
            assert!(msg.contains("news.feeds"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_bad_feed_scheme() {
        let mut config = Config::default();
        config.news.feeds = vec!["ftp://example.com/feed.xml".to_string()];
        assert!(config.validate().is_err());

        config.news.feeds = vec!["not a url".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_interval_and_top_n() {
        let mut config = Config::default();
        config.news.refresh_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.news.top_n = 0;
        assert!(config.validate().is_err());
    }
}
