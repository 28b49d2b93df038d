//! Environment-driven configuration.
//!
//! All settings come from `LEXFIRM_*` environment variables (a `.env` file is
//! honored via dotenvy before resolution). Values are parsed once at startup
//! into typed config structs; anything malformed fails fast with a
//! [`ConfigError`] naming the offending key.

use std::net::SocketAddr;

use crate::error::ConfigError;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_DB_PATH: &str = "lexfirm.db";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const MIN_JWT_SECRET_LEN: usize = 16;

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Extra CORS origins beyond the bind-derived localhost ones.
    pub cors_origins: Vec<String>,
}

/// Database backend settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file. `:memory:` for an ephemeral store.
    pub path: String,
}

/// Token issuance/verification settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn resolve() -> Result<Self, ConfigError> {
        let bind = parse_bind(
            "LEXFIRM_BIND",
            optional_env("LEXFIRM_BIND").as_deref().unwrap_or(DEFAULT_BIND),
        )?;
        let cors_origins = optional_env("LEXFIRM_CORS_ORIGINS")
            .map(|raw| parse_csv(&raw))
            .unwrap_or_default();
        let path = optional_env("LEXFIRM_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let jwt_secret = validate_jwt_secret(
            "LEXFIRM_JWT_SECRET",
            optional_env("LEXFIRM_JWT_SECRET").ok_or_else(|| ConfigError::Missing {
                key: "LEXFIRM_JWT_SECRET".to_string(),
            })?,
        )?;
        let token_ttl_hours = match optional_env("LEXFIRM_TOKEN_TTL_HOURS") {
            Some(raw) => parse_positive_i64("LEXFIRM_TOKEN_TTL_HOURS", &raw)?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };
        let log_json = match optional_env("LEXFIRM_LOG_JSON") {
            Some(raw) => parse_bool("LEXFIRM_LOG_JSON", &raw)?,
            None => false,
        };

        Ok(Self {
            server: ServerConfig { bind, cors_origins },
            database: DatabaseConfig { path },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_hours,
            },
            log_json,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bind(key: &str, raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{raw}' is not a socket address (host:port)"),
    })
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{other}' is not a boolean"),
        }),
    }
}

fn parse_positive_i64(key: &str, raw: &str) -> Result<i64, ConfigError> {
    let value: i64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{raw}' is not an integer"),
    })?;
    if value <= 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn validate_jwt_secret(key: &str, secret: String) -> Result<String, ConfigError> {
    if secret.len() < MIN_JWT_SECRET_LEN {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must be at least {MIN_JWT_SECRET_LEN} characters"),
        });
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::{parse_bind, parse_bool, parse_csv, parse_positive_i64, validate_jwt_secret};

    #[test]
    fn bind_parses_host_and_port() {
        let addr = parse_bind("LEXFIRM_BIND", "0.0.0.0:9000").expect("valid bind");
        assert_eq!(addr.port(), 9000);
        assert!(parse_bind("LEXFIRM_BIND", "not-an-addr").is_err());
    }

    #[test]
    fn csv_origins_trim_and_skip_empties() {
        assert_eq!(
            parse_csv(" https://a.example , ,https://b.example"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn bool_accepts_common_spellings() {
        assert!(parse_bool("K", "true").unwrap());
        assert!(parse_bool("K", "ON").unwrap());
        assert!(!parse_bool("K", "0").unwrap());
        assert!(parse_bool("K", "maybe").is_err());
    }

    #[test]
    fn ttl_must_be_positive() {
        assert_eq!(parse_positive_i64("K", "24").unwrap(), 24);
        assert!(parse_positive_i64("K", "0").is_err());
        assert!(parse_positive_i64("K", "-3").is_err());
    }

    #[test]
    fn jwt_secret_requires_minimum_length() {
        assert!(validate_jwt_secret("K", "short".to_string()).is_err());
        assert!(validate_jwt_secret("K", "a-long-enough-secret".to_string()).is_ok());
    }
}
