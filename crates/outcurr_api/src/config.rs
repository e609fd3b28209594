//! Server configuration.
//!
//! All settings come from `OUTCURR_*` environment variables. Empty values are
//! treated as unset.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_JWT_LEEWAY_SECONDS: u64 = 60;

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is required")]
    Missing { name: &'static str },
    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Bearer token verification settings.
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HS256 signing secret.
    pub hs256_secret: String,
    /// Required `iss` claim, when set.
    pub issuer: Option<String>,
    /// Required `aud` claim, when set.
    pub audience: Option<String>,
    /// Allowed clock skew for `exp`/`nbf`.
    pub leeway_seconds: u64,
}

impl JwtConfig {
    /// HS256 config with no issuer/audience checks and the default leeway.
    pub fn hs256(secret: impl Into<String>) -> Self {
        Self {
            hs256_secret: secret.into(),
            issuer: None,
            audience: None,
            leeway_seconds: DEFAULT_JWT_LEEWAY_SECONDS,
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("hs256_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub http_addr: SocketAddr,
    /// SQLite file; `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    pub jwt: JwtConfig,
    /// Optional bound on how long a request waits for the store.
    pub request_timeout: Option<Duration>,
    /// Optional cap on in-flight requests.
    pub concurrency_limit: Option<usize>,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
}

impl ServerConfig {
    /// Defaults suitable for tests and local runs.
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: None,
            jwt,
            request_timeout: None,
            concurrency_limit: None,
            log_level: outcurr_core::default_log_level().to_string(),
            log_dir: std::env::temp_dir()
                .join("outcurr-logs")
                .display()
                .to_string(),
        }
    }

    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when `OUTCURR_JWT_SECRET` is missing or any variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = EnvReader { lookup };

        let secret = env
            .string("OUTCURR_JWT_SECRET")
            .ok_or(ConfigError::Missing {
                name: "OUTCURR_JWT_SECRET",
            })?;
        let mut jwt = JwtConfig::hs256(secret);
        jwt.issuer = env.string("OUTCURR_JWT_ISSUER");
        jwt.audience = env.string("OUTCURR_JWT_AUDIENCE");
        if let Some(leeway) = env.parsed::<u64>("OUTCURR_JWT_LEEWAY_SECONDS")? {
            jwt.leeway_seconds = leeway;
        }

        let http_addr = match env.string("OUTCURR_HTTP_ADDR") {
            Some(raw) => parse_addr("OUTCURR_HTTP_ADDR", &raw)?,
            None => parse_addr("OUTCURR_HTTP_ADDR", DEFAULT_HTTP_ADDR)?,
        };

        let log_dir = match env.string("OUTCURR_LOG_DIR") {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|err| ConfigError::Invalid {
                    name: "OUTCURR_LOG_DIR",
                    message: format!("cannot resolve default from working directory: {err}"),
                })?
                .join("logs")
                .display()
                .to_string(),
        };

        Ok(Self {
            http_addr,
            db_path: env.string("OUTCURR_DB_PATH").map(PathBuf::from),
            jwt,
            request_timeout: env
                .parsed::<u64>("OUTCURR_REQUEST_TIMEOUT_SECONDS")?
                .map(Duration::from_secs),
            concurrency_limit: env.parsed::<usize>("OUTCURR_CONCURRENCY_LIMIT")?,
            log_level: env
                .string("OUTCURR_LOG_LEVEL")
                .unwrap_or_else(|| outcurr_core::default_log_level().to_string()),
            log_dir,
        })
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parsed<T>(&self, name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.string(name) else {
            return Ok(None);
        };
        raw.parse::<T>()
            .map(Some)
            .map_err(|err| ConfigError::Invalid {
                name,
                message: format!("`{raw}`: {err}"),
            })
    }
}

fn parse_addr(name: &'static str, raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.parse::<SocketAddr>()
        .map_err(|err| ConfigError::Invalid {
            name,
            message: format!("`{raw}`: {err}"),
        })
}
