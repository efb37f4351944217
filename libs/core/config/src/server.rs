use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Header carrying the authenticated user id when none is configured
pub const DEFAULT_SESSION_HEADER: &str = "x-user-id";

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; empty means CORS is left unconfigured
    pub cors_allowed_origins: Vec<String>,
    /// Request header the upstream auth layer uses to forward the user id
    pub session_header: String,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            cors_allowed_origins: Vec::new(),
            session_header: DEFAULT_SESSION_HEADER.to_string(),
        }
    }

    pub fn with_cors_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Splits a comma separated origin list, dropping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 3000
    /// - CORS_ALLOWED_ORIGIN: comma separated, defaults to none
    /// - SESSION_USER_HEADER: defaults to x-user-id
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse("PORT", 3000u16)?;
        let cors_allowed_origins = parse_origins(&env_or_default("CORS_ALLOWED_ORIGIN", ""));
        let session_header = env_or_default("SESSION_USER_HEADER", DEFAULT_SESSION_HEADER)
            .trim()
            .to_ascii_lowercase();

        if session_header.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "SESSION_USER_HEADER".to_string(),
                details: "must not be blank".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            session_header,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 3000)
    }
}
