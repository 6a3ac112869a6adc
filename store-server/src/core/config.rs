use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | STORE_HTTP_ADDR | 0.0.0.0:3000 | HTTP listen address |
/// | STORE_DB_PATH | /var/lib/store/store.db | Embedded database path |
/// | STORE_LOG_LEVEL | info | Log level when RUST_LOG is unset |
/// | STORE_LOG_DIR | (stdout only) | Directory for daily-rolling log files |
/// | STORE_JWT_SECRET | (generated) | HS256 secret shared with the token issuer |
/// | STORE_ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// STORE_DB_PATH=/data/store.db STORE_HTTP_ADDR=127.0.0.1:8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen address, host and port
    pub http_addr: String,
    /// Path of the embedded database directory
    pub db_path: String,
    /// Default log level
    pub log_level: String,
    /// Log file directory; stdout only when unset
    pub log_dir: Option<String>,
    /// JWT validation configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults. A generated JWT secret
    /// only accepts tokens minted in-process, which is what development and
    /// tests want; production must set `STORE_JWT_SECRET`.
    pub fn from_env() -> Self {
        Self {
            http_addr: std::env::var("STORE_HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            db_path: std::env::var("STORE_DB_PATH")
                .unwrap_or_else(|_| "/var/lib/store/store.db".into()),
            log_level: std::env::var("STORE_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("STORE_LOG_DIR").ok(),
            jwt: std::env::var("STORE_JWT_SECRET")
                .map(JwtConfig::new)
                .unwrap_or_default(),
            environment: std::env::var("STORE_ENVIRONMENT")
                .unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the paths that tests care about
    pub fn with_overrides(db_path: impl Into<String>, http_addr: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.db_path = db_path.into();
        config.http_addr = http_addr.into();
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/store-test.db", "127.0.0.1:0");
        assert_eq!(config.db_path, "/tmp/store-test.db");
        assert_eq!(config.http_addr, "127.0.0.1:0");
    }

    #[test]
    fn test_environment_predicates() {
        let mut config = Config::with_overrides("/tmp/store-test.db", "127.0.0.1:0");
        config.environment = "production".to_string();
        assert!(config.is_production());
        assert!(!config.is_development());
    }
}
