use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::leads::FailurePolicy;

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
    pub remote: RemoteConfig,
    pub outreach: OutreachConfig,
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

        let request_timeout = match non_blank_var("LEADS_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidTimeout)?,
            ),
            None => None,
        };

        let failure_policy = match non_blank_var("OUTREACH_REVERT_ON_FAILURE") {
            Some(raw) if is_truthy(&raw) => FailurePolicy::Revert,
            _ => FailurePolicy::KeepOptimistic,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            remote: RemoteConfig {
                store_url: non_blank_var("LEADS_STORE_URL"),
                store_key: non_blank_var("LEADS_STORE_KEY"),
                webhook_url: non_blank_var("OUTREACH_WEBHOOK_URL"),
                request_timeout,
            },
            outreach: OutreachConfig { failure_policy },
        })
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Endpoints for the remote lead store and the outreach webhook.
///
/// Both are optional at load time so commands that never touch the network
/// (the offline demo) run without them.
#[derive(Debug, Clone, Default)]
pub struct RemoteConfig {
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub webhook_url: Option<String>,
    pub request_timeout: Option<Duration>,
}

/// Resolved credentials for the lead store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub base_url: String,
    pub api_key: String,
}

impl RemoteConfig {
    pub fn store(&self) -> Result<StoreSettings, ConfigError> {
        let base_url = self
            .store_url
            .clone()
            .ok_or(ConfigError::MissingVar("LEADS_STORE_URL"))?;
        let api_key = self
            .store_key
            .clone()
            .ok_or(ConfigError::MissingVar("LEADS_STORE_KEY"))?;
        Ok(StoreSettings { base_url, api_key })
    }

    pub fn webhook(&self) -> Result<String, ConfigError> {
        self.webhook_url
            .clone()
            .ok_or(ConfigError::MissingVar("OUTREACH_WEBHOOK_URL"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OutreachConfig {
    pub failure_policy: FailurePolicy,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    MissingVar(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "LEADS_HTTP_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::MissingVar(name) => write!(f, "{name} must be set"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::MissingVar(_) => None,
        }
    }
}
