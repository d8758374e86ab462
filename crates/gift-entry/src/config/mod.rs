use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::gift_entry::config::DEFAULT_NAMESPACE;
use crate::workflows::gift_entry::{GiftEntryConfig, ImportFieldNames, MessageCatalog};

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
    pub gift_entry: GiftEntryConfig,
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

        let namespace =
            env::var("APP_FIELD_NAMESPACE").unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let messages = match env::var("APP_MESSAGE_CATALOG") {
            Ok(path) if !path.trim().is_empty() => load_catalog(PathBuf::from(path))?,
            _ => MessageCatalog::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            gift_entry: GiftEntryConfig {
                fields: ImportFieldNames::with_namespace(&namespace),
                messages,
            },
        })
    }
}

fn load_catalog(path: PathBuf) -> Result<MessageCatalog, ConfigError> {
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::CatalogUnreadable {
        path: path.clone(),
        source,
    })?;
    MessageCatalog::from_json(&raw).map_err(|source| ConfigError::CatalogInvalid { path, source })
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

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    CatalogUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    CatalogInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::CatalogUnreadable { path, .. } => {
                write!(f, "APP_MESSAGE_CATALOG '{}' could not be read", path.display())
            }
            ConfigError::CatalogInvalid { path, .. } => {
                write!(
                    f,
                    "APP_MESSAGE_CATALOG '{}' is not a valid message catalog",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::CatalogUnreadable { source, .. } => Some(source),
            ConfigError::CatalogInvalid { source, .. } => Some(source),
        }
    }
}
