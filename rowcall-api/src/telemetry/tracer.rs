//! Tracing Subscriber Initialization
//!
//! Structured logs go to stdout through `tracing-subscriber`, filtered by
//! `RUST_LOG` (falling back to the configured default directive).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_LOG_FILTER: &str = "rowcall_api=debug,tower_http=info,info";

/// Log line encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "text" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the start-up log line
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (production, staging, development)
    pub environment: String,
    pub log_format: LogFormat,
    /// Filter used when `RUST_LOG` is unset or invalid
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "rowcall-api".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Json,
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Defaults overridden by environment variables.
    ///
    /// - `ROWCALL_SERVICE_NAME`
    /// - `ROWCALL_ENVIRONMENT`
    /// - `ROWCALL_LOG_FORMAT`: "json" (default) or "pretty"
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            service_name: lookup("ROWCALL_SERVICE_NAME").unwrap_or(defaults.service_name),
            environment: lookup("ROWCALL_ENVIRONMENT").unwrap_or(defaults.environment),
            log_format: lookup("ROWCALL_LOG_FORMAT")
                .and_then(|raw| LogFormat::parse(&raw))
                .unwrap_or(defaults.log_format),
            ..defaults
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at start-up, before anything logs.
pub fn init_tracer(config: &TelemetryConfig) -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        service_version = %config.service_version,
        environment = %config.environment,
        "Telemetry initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "rowcall-api");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.default_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_telemetry_config_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ROWCALL_ENVIRONMENT", "production"),
            ("ROWCALL_LOG_FORMAT", "pretty"),
        ]
        .into_iter()
        .collect();
        let config = TelemetryConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.environment, "production");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.service_name, "rowcall-api");
    }

    #[test]
    fn test_unknown_log_format_falls_back() {
        let config = TelemetryConfig::from_lookup(|key| {
            (key == "ROWCALL_LOG_FORMAT").then(|| "xml".to_string())
        });
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
