use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::orders::DEFAULT_CURRENCY;
use crate::trust::MIN_OVERRIDE_REASON_LEN;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub fulfillment: FulfillmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let override_reason_min_len = match env::var("TRUST_OVERRIDE_REASON_MIN_LEN") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|value| *value >= MIN_OVERRIDE_REASON_LEN)
                .ok_or(ConfigError::InvalidReasonLength { value: raw })?,
            Err(_) => MIN_OVERRIDE_REASON_LEN,
        };

        let default_currency = match env::var("ORDER_DEFAULT_CURRENCY") {
            Ok(raw) => parse_currency(&raw)?,
            Err(_) => DEFAULT_CURRENCY.to_string(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            fulfillment: FulfillmentConfig {
                override_reason_min_len,
                default_currency,
            },
        })
    }
}

fn parse_currency(raw: &str) -> Result<String, ConfigError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ConfigError::InvalidCurrency {
            value: raw.to_string(),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Business dials shared by the order guard and trust manager.
#[derive(Debug, Clone)]
pub struct FulfillmentConfig {
    pub override_reason_min_len: usize,
    pub default_currency: String,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            override_reason_min_len: MIN_OVERRIDE_REASON_LEN,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidReasonLength { value: String },
    InvalidCurrency { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidReasonLength { value } => write!(
                f,
                "TRUST_OVERRIDE_REASON_MIN_LEN must be an integer >= {MIN_OVERRIDE_REASON_LEN} (found '{value}')"
            ),
            ConfigError::InvalidCurrency { value } => write!(
                f,
                "ORDER_DEFAULT_CURRENCY must be a three letter code (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidReasonLength { .. }
            | ConfigError::InvalidCurrency { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("TRUST_OVERRIDE_REASON_MIN_LEN");
        env::remove_var("ORDER_DEFAULT_CURRENCY");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.fulfillment.override_reason_min_len, 10);
        assert_eq!(config.fulfillment.default_currency, "GHS");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_override_reason_minimum_below_floor() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TRUST_OVERRIDE_REASON_MIN_LEN", "4");
        match AppConfig::load() {
            Err(ConfigError::InvalidReasonLength { value }) => assert_eq!(value, "4"),
            other => panic!("expected reason length error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn normalizes_default_currency() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ORDER_DEFAULT_CURRENCY", " usd ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.fulfillment.default_currency, "USD");

        env::set_var("ORDER_DEFAULT_CURRENCY", "cedi");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCurrency { .. })
        ));
        reset_env();
    }
}
