//! Server configuration for the Folio REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REST_SERVER_PORT` | 8888 | Server port |
//! | `REST_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `REST_LOG_LEVEL` | info | Log level |
//! | `REST_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `REST_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `REST_ENABLE_CORS` | true | Enable CORS |
//! | `REST_CORS_ORIGINS` | site and admin panel origins | Allowed origins |
//! | `REST_CORS_ORIGIN_HOSTS` | figma.com,localhost,127.0.0.1 | Hosts allowed on any scheme/port |
//! | `REST_CORS_ALLOW_CREDENTIALS` | true | Allow cookies and credentials |
//! | `REST_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `REST_CORS_HEADERS` | Content-Type,Authorization,authtoken | Allowed headers |
//! | `REST_STORAGE_BACKEND` | sqlite | memory, sqlite or mongodb |
//! | `REST_DATABASE_URL` | - | SQLite path or MongoDB URI |
//! | `REST_DATABASE_NAME` | fullstack-app | MongoDB database name |
//! | `REST_LEGACY_ID_FALLBACK` | false | Match legacy string `_id`s on writes |
//! | `REST_AUTH_TOKENS` | - | Accepted static bearer tokens |
//! | `REST_JWT_SECRET` | - | HS256 secret for bearer JWTs |
//!
//! # Example
//!
//! ```rust
//! use folio_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;
use folio_persistence::identifier::FilterPolicy;

/// Origins of the public site, the admin panel and local development.
pub const DEFAULT_CORS_ORIGINS: &str = concat!(
    "http://localhost:3000,http://localhost:3001,",
    "http://127.0.0.1:3000,http://127.0.0.1:3001,",
    "https://www.figma.com,https://figma.com,",
    "https://myportfolio-q88t.vercel.app,",
    "https://myportfolio-pied-eta-vykkrihxyw.vercel.app,",
    "https://portfolio-admin-panel-brown.vercel.app",
);

/// Hosts whose origins are allowed on any scheme and port, subdomains
/// included.
pub const DEFAULT_CORS_ORIGIN_HOSTS: &str = "figma.com,localhost,127.0.0.1";

/// Which document store the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendMode {
    /// Process-local, lost on exit.
    Memory,
    /// SQLite file (or `:memory:`).
    Sqlite,
    /// MongoDB deployment.
    MongoDB,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Memory => write!(f, "memory"),
            StorageBackendMode::Sqlite => write!(f, "sqlite"),
            StorageBackendMode::MongoDB => write!(f, "mongodb"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackendMode::Memory),
            "sqlite" => Ok(StorageBackendMode::Sqlite),
            "mongodb" | "mongo" => Ok(StorageBackendMode::MongoDB),
            other => Err(format!(
                "unknown storage backend '{}' (expected memory, sqlite or mongodb)",
                other
            )),
        }
    }
}

/// Server configuration for the Folio REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio content REST server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "REST_SERVER_PORT", default_value = "8888")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "REST_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "REST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "REST_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "REST_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "REST_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "REST_CORS_ORIGINS", default_value = DEFAULT_CORS_ORIGINS)]
    pub cors_origins: String,

    /// Hosts allowed as CORS origins on any scheme and port, subdomains
    /// included (comma-separated).
    #[arg(long, env = "REST_CORS_ORIGIN_HOSTS", default_value = DEFAULT_CORS_ORIGIN_HOSTS)]
    pub cors_origin_hosts: String,

    /// Allow credentials on CORS requests. Ignored when any CORS setting is `*`.
    #[arg(long, env = "REST_CORS_ALLOW_CREDENTIALS", default_value = "true")]
    pub cors_allow_credentials: bool,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "REST_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "REST_CORS_HEADERS",
        default_value = "Content-Type,Authorization,authtoken"
    )]
    pub cors_headers: String,

    /// Storage backend: memory, sqlite or mongodb.
    #[arg(long, env = "REST_STORAGE_BACKEND", default_value = "sqlite")]
    pub storage_backend: String,

    /// Database connection string (SQLite path or MongoDB URI).
    #[arg(long, env = "REST_DATABASE_URL")]
    pub database_url: Option<String>,

    /// MongoDB database name.
    #[arg(long, env = "REST_DATABASE_NAME", default_value = "fullstack-app")]
    pub database_name: String,

    /// Let update and delete match documents whose `_id` holds the
    /// identifier as a plain string.
    #[arg(long, env = "REST_LEGACY_ID_FALLBACK", default_value = "false")]
    pub legacy_id_fallback: bool,

    /// Static bearer tokens accepted for mutations (comma-separated).
    #[arg(long, env = "REST_AUTH_TOKENS")]
    pub auth_tokens: Option<String>,

    /// Shared secret for HS256 bearer JWTs.
    #[arg(long, env = "REST_JWT_SECRET")]
    pub jwt_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8888,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: DEFAULT_CORS_ORIGINS.to_string(),
            cors_origin_hosts: DEFAULT_CORS_ORIGIN_HOSTS.to_string(),
            cors_allow_credentials: true,
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,authtoken".to_string(),
            storage_backend: "sqlite".to_string(),
            database_url: None,
            database_name: "fullstack-app".to_string(),
            legacy_id_fallback: false,
            auth_tokens: None,
            jwt_secret: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses [`ServerConfig::storage_backend`].
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        self.storage_backend.parse()
    }

    /// Returns the identifier filter policy derived from this configuration.
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::default().with_legacy_canonical_fallback(self.legacy_id_fallback)
    }

    /// Returns the configured static tokens, trimmed, without empties.
    pub fn auth_token_list(&self) -> Vec<String> {
        self.auth_tokens
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect()
    }

    /// Returns `true` if a browser origin passes the CORS origin policy.
    ///
    /// An origin passes when it is listed in `cors_origins`, when
    /// `cors_origins` is `*`, or when its host is one of
    /// `cors_origin_hosts` or a subdomain of one.
    pub fn cors_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.trim() == "*" {
            return true;
        }
        if split_list(&self.cors_origins).any(|allowed| allowed.eq_ignore_ascii_case(origin)) {
            return true;
        }

        let Some(host) = origin_host(origin) else {
            return false;
        };
        split_list(&self.cors_origin_hosts).any(|allowed| {
            host.eq_ignore_ascii_case(allowed)
                || host
                    .to_ascii_lowercase()
                    .ends_with(&format!(".{}", allowed.to_ascii_lowercase()))
        })
    }

    /// Returns `true` if credentials can be allowed with the CORS settings.
    ///
    /// Browsers reject credentials combined with wildcards, so any `*`
    /// setting disables them.
    pub fn cors_credentials_enabled(&self) -> bool {
        self.cors_allow_credentials
            && [&self.cors_origins, &self.cors_methods, &self.cors_headers]
                .iter()
                .all(|setting| setting.trim() != "*")
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        match self.storage_backend_mode() {
            Ok(StorageBackendMode::MongoDB) => {
                if self.database_url.is_none() {
                    errors.push("MongoDB backend requires a database URL".to_string());
                }
                if self.database_name.trim().is_empty() {
                    errors.push("Database name cannot be empty".to_string());
                }
            }
            Ok(_) => {}
            Err(e) => errors.push(e),
        }

        if matches!(self.jwt_secret.as_deref(), Some(secret) if secret.is_empty()) {
            errors.push("JWT secret cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, the memory backend, and disables features
    /// that might interfere with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            max_body_size: 10 * 1024 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_origin_hosts: String::new(),
            cors_allow_credentials: false,
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            storage_backend: "memory".to_string(),
            database_url: None,
            database_name: "folio-test".to_string(),
            legacy_id_fallback: false,
            auth_tokens: Some("test-token".to_string()),
            jwt_secret: None,
        }
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Extracts the host of a `scheme://host[:port]` origin.
fn origin_host(origin: &str) -> Option<&str> {
    let (_, authority) = origin.split_once("://")?;
    let authority = authority.split('/').next().unwrap_or_default();

    let host = if let Some(bracketed) = authority.strip_prefix('[') {
        bracketed.split(']').next().unwrap_or_default()
    } else {
        authority.split(':').next().unwrap_or_default()
    };
    (!host.is_empty()).then_some(host)
}
