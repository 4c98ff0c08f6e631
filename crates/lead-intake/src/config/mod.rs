use crate::workflows::leads::{GateConfig, YesNo};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com";
const DEFAULT_AIRTABLE_TABLE: &str = "Leads";
const DEFAULT_AIRTABLE_TIMEOUT_SECS: u64 = 10;

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
    pub gates: GateConfig,
    /// `None` when no Airtable credentials were supplied.
    pub store: Option<AirtableConfig>,
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

        let gates = GateConfig {
            require_california: env_switch("GATE_CA_ONLY"),
            require_kern_county: env_switch("GATE_KERN_ONLY"),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            gates,
            store: AirtableConfig::from_env()?,
        })
    }
}

/// Reads an optional on/off switch; unset or blank leaves the switch absent.
fn env_switch(key: &str) -> Option<bool> {
    let raw = env::var(key).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(YesNo::parse(Some(&raw)) == YesNo::Yes)
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Credentials and endpoint for the Airtable lead table.
#[derive(Clone)]
pub struct AirtableConfig {
    pub api_url: String,
    pub base_id: String,
    pub table: String,
    pub token: String,
    pub timeout: Duration,
}

impl AirtableConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let token = non_blank_var("AIRTABLE_TOKEN");
        let base_id = non_blank_var("AIRTABLE_BASE_ID");

        let (token, base_id) = match (token, base_id) {
            (Some(token), Some(base_id)) => (token, base_id),
            (None, None) => return Ok(None),
            (Some(_), None) => return Err(ConfigError::IncompleteStore("AIRTABLE_BASE_ID")),
            (None, Some(_)) => return Err(ConfigError::IncompleteStore("AIRTABLE_TOKEN")),
        };

        let timeout_secs = match non_blank_var("AIRTABLE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidStoreTimeout)?,
            None => DEFAULT_AIRTABLE_TIMEOUT_SECS,
        };

        Ok(Some(Self {
            api_url: non_blank_var("AIRTABLE_API_URL")
                .unwrap_or_else(|| DEFAULT_AIRTABLE_API_URL.to_string()),
            base_id,
            table: non_blank_var("AIRTABLE_TABLE")
                .unwrap_or_else(|| DEFAULT_AIRTABLE_TABLE.to_string()),
            token,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_url", &self.api_url)
            .field("base_id", &self.base_id)
            .field("table", &self.table)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStoreTimeout,
    IncompleteStore(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStoreTimeout => {
                write!(f, "AIRTABLE_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::IncompleteStore(missing) => {
                write!(f, "Airtable store is partially configured: {missing} is missing")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidStoreTimeout
            | ConfigError::IncompleteStore(_) => None,
        }
    }
}
