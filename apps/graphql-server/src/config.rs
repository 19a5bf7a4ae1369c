//! Centralized configuration for graphql-server.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than at request time.

use axum::http::HeaderValue;
use std::env;
use std::fmt;

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Server configuration loaded from environment variables.
///
/// All fields are validated at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port (default: 5000)
    pub port: u16,
    /// CORS allow origin; `*` means permissive
    pub cors_allow_origin: HeaderValue,
    /// Log format
    pub log_format: LogFormat,
    /// Serve the GraphiQL IDE on GET /graphql
    pub graphiql_enabled: bool,
    /// Start with the sample customers and transactions
    pub seed_data: bool,
    /// Maximum nesting depth accepted by the schema
    pub max_query_depth: usize,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// Fails fast on invalid configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Port
        let port = match lookup("PORT") {
            Some(s) => s.trim().parse::<u16>().map_err(|e| ConfigError {
                field: "PORT",
                message: format!("Invalid port '{}': {}", s, e),
            })?,
            None => 5000,
        };

        // CORS allow origin
        let cors_origin_str = lookup("CORS_ALLOW_ORIGIN").unwrap_or_else(|| "*".into());
        let cors_allow_origin = if cors_origin_str == "*" {
            HeaderValue::from_static("*")
        } else {
            HeaderValue::from_str(&cors_origin_str).map_err(|e| ConfigError {
                field: "CORS_ALLOW_ORIGIN",
                message: format!("Invalid header value '{}': {}", cors_origin_str, e),
            })?
        };

        // Log format
        let log_format =
            LogFormat::from_str(&lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".into()));

        let graphiql_enabled = parse_flag("GRAPHIQL_ENABLED", lookup("GRAPHIQL_ENABLED"), true)?;
        let seed_data = parse_flag("SEED_DATA", lookup("SEED_DATA"), true)?;

        // Query depth
        let max_query_depth = match lookup("GRAPHQL_MAX_DEPTH") {
            Some(s) => match s.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError {
                        field: "GRAPHQL_MAX_DEPTH",
                        message: format!("Expected a positive integer, got '{}'", s),
                    })
                }
            },
            None => 16,
        };

        Ok(Self {
            port,
            cors_allow_origin,
            log_format,
            graphiql_enabled,
            seed_data,
            max_query_depth,
        })
    }

    /// Log notes about settings that differ from a typical deployment.
    pub fn log_summary(&self) {
        if !self.seed_data {
            tracing::info!("SEED_DATA disabled: starting with an empty store");
        }
        if self.cors_allow_origin == HeaderValue::from_static("*") {
            tracing::warn!(
                "CORS_ALLOW_ORIGIN=*: any origin may call the API. \
                 Set CORS_ALLOW_ORIGIN to restrict it."
            );
        }
    }
}

fn parse_flag(
    field: &'static str,
    raw: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError {
            field,
            message: format!("Expected true/false, got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.cors_allow_origin, HeaderValue::from_static("*"));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert!(cfg.graphiql_enabled);
        assert!(cfg.seed_data);
        assert_eq!(cfg.max_query_depth, 16);
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            ("PORT", "8080"),
            ("CORS_ALLOW_ORIGIN", "https://app.example.com"),
            ("LOG_FORMAT", "json"),
            ("GRAPHIQL_ENABLED", "no"),
            ("SEED_DATA", "0"),
            ("GRAPHQL_MAX_DEPTH", "4"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.cors_allow_origin, "https://app.example.com");
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert!(!cfg.graphiql_enabled);
        assert!(!cfg.seed_data);
        assert_eq!(cfg.max_query_depth, 4);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(load(&[("PORT", "http")]).unwrap_err().field, "PORT");
        assert_eq!(
            load(&[("SEED_DATA", "maybe")]).unwrap_err().field,
            "SEED_DATA"
        );
        assert_eq!(
            load(&[("GRAPHQL_MAX_DEPTH", "0")]).unwrap_err().field,
            "GRAPHQL_MAX_DEPTH"
        );
        assert_eq!(
            load(&[("CORS_ALLOW_ORIGIN", "bad\norigin")])
                .unwrap_err()
                .field,
            "CORS_ALLOW_ORIGIN"
        );
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::from_str("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str("anything"), LogFormat::Pretty);
    }
}
