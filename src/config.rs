//! Configuration for the authorization gateway.
//!
//! One document (here: environment variables) enumerates credential
//! verification keys, session/token lifetimes, SIEM sinks and server
//! settings (spec.md §6 "Configuration"). Environment variables follow the
//! pattern `GATEWAY_<SECTION>_<KEY>`.

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub credential: CredentialConfig,
    pub session: SessionConfig,
    pub siem: SiemConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// End-to-end request deadline (spec.md §5 default 200ms).
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8443,
            request_timeout_secs: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Bearer-token verification keys (spec.md §6 "Credential tokens").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// HMAC secret used to verify and (in test/demo deployments) mint
    /// bearer tokens. A production deployment should supply an asymmetric
    /// key via `GATEWAY_CREDENTIAL_JWT_SECRET` backed by a real secret
    /// store; this gateway does not prescribe one (spec.md §1 Non-goals).
    pub jwt_secret: String,
    /// One of the `jsonwebtoken::Algorithm` variant names (e.g. `HS256`).
    pub jwt_algorithm: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            jwt_algorithm: "HS256".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_ttl_secs: 3600,
            refresh_ttl_secs: 60 * 60 * 24 * 30,
        }
    }
}

/// One configured SIEM sink (spec.md §6 "SIEM sinks"): the core does not
/// prescribe sink kinds, so only the HTTP/webhook kind this workspace
/// ships an adapter for is configurable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiemSinkConfig {
    pub id: String,
    pub endpoint: String,
    pub auth_header: Option<String>,
    pub max_payload_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiemConfig {
    pub sinks: Vec<SiemSinkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { requests_per_minute: 600 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            credential: CredentialConfig::default(),
            session: SessionConfig::default(),
            siem: SiemConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `GATEWAY_*` environment variables over
    /// the defaults above. Unknown `GATEWAY_SIEM_SINKS` entries are parsed
    /// as `id@endpoint` pairs separated by `;` — there is no file-based
    /// sink manifest in this deployment shape.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("GATEWAY_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("GATEWAY_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(timeout) = env::var("GATEWAY_SERVER_REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                config.server.request_timeout_secs = timeout;
            }
        }

        if let Ok(level) = env::var("GATEWAY_LOGGING_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = env::var("GATEWAY_LOGGING_FORMAT") {
            config.logging.format = format;
        }

        if let Ok(secret) = env::var("GATEWAY_CREDENTIAL_JWT_SECRET") {
            config.credential.jwt_secret = secret;
        }
        if let Ok(alg) = env::var("GATEWAY_CREDENTIAL_JWT_ALGORITHM") {
            config.credential.jwt_algorithm = alg;
        }

        if let Ok(ttl) = env::var("GATEWAY_SESSION_ACCESS_TTL_SECS") {
            if let Ok(ttl) = ttl.parse() {
                config.session.access_ttl_secs = ttl;
            }
        }
        if let Ok(ttl) = env::var("GATEWAY_SESSION_REFRESH_TTL_SECS") {
            if let Ok(ttl) = ttl.parse() {
                config.session.refresh_ttl_secs = ttl;
            }
        }

        if let Ok(sinks) = env::var("GATEWAY_SIEM_SINKS") {
            config.siem.sinks = sinks
                .split(';')
                .filter(|s| !s.is_empty())
                .filter_map(|entry| {
                    let (id, endpoint) = entry.split_once('@')?;
                    Some(SiemSinkConfig {
                        id: id.to_string(),
                        endpoint: endpoint.to_string(),
                        auth_header: None,
                        max_payload_size: 100,
                    })
                })
                .collect();
        }

        if let Ok(rpm) = env::var("GATEWAY_RATE_LIMIT_REQUESTS_PER_MINUTE") {
            if let Ok(rpm) = rpm.parse() {
                config.rate_limit.requests_per_minute = rpm;
            }
        }

        config
    }

    /// Fails fast on invalid configuration (spec.md §6: "unknown options
    /// are errors"; values out of range are the analogous failure for the
    /// options this deployment shape actually exposes).
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server port cannot be 0".to_string());
        }
        if self.server.request_timeout_secs == 0 {
            return Err("request timeout cannot be 0".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!("invalid log level '{}'", self.logging.level));
        }
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(format!("invalid log format '{}'", self.logging.format));
        }

        if self.credential.jwt_secret.is_empty() {
            return Err("credential jwt secret cannot be empty".to_string());
        }
        if parse_algorithm(&self.credential.jwt_algorithm).is_none() {
            return Err(format!("invalid jwt algorithm '{}'", self.credential.jwt_algorithm));
        }

        if self.session.access_ttl_secs <= 0 {
            return Err("session access ttl must be positive".to_string());
        }
        if self.session.refresh_ttl_secs <= 0 {
            return Err("session refresh ttl must be positive".to_string());
        }

        for sink in &self.siem.sinks {
            if sink.id.is_empty() || sink.endpoint.is_empty() {
                return Err("siem sink requires a non-empty id and endpoint".to_string());
            }
        }

        if self.rate_limit.requests_per_minute == 0 {
            return Err("rate limit requests_per_minute cannot be 0".to_string());
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Maps the configured algorithm name to a `jsonwebtoken::Algorithm`
/// (the crate's enum has no `FromStr` impl of its own).
pub fn parse_algorithm(name: &str) -> Option<jsonwebtoken::Algorithm> {
    use jsonwebtoken::Algorithm::*;
    Some(match name {
        "HS256" => HS256,
        "HS384" => HS384,
        "HS512" => HS512,
        "RS256" => RS256,
        "RS384" => RS384,
        "RS512" => RS512,
        "ES256" => ES256,
        "ES384" => ES384,
        "PS256" => PS256,
        "PS384" => PS384,
        "PS512" => PS512,
        "EdDSA" => EdDSA,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_jwt_algorithm_is_rejected() {
        let mut config = Config::default();
        config.credential.jwt_algorithm = "not-a-real-alg".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_env_overrides_defaults() {
        unsafe {
            env::set_var("GATEWAY_SERVER_PORT", "9000");
            env::set_var("GATEWAY_LOGGING_LEVEL", "debug");
        }
        let config = Config::from_env();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        unsafe {
            env::remove_var("GATEWAY_SERVER_PORT");
            env::remove_var("GATEWAY_LOGGING_LEVEL");
        }
    }
}
