//! Process configuration.
//!
//! Built once at start-up and shared read-only (behind an `Arc`) with the
//! row store, the call provider and the HTTP layer. Nothing else reads the
//! environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::{ConfigError, StatusPolicy};

pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.bolna.ai";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_CREDENTIALS_PATH: &str = "./sheet.json";
pub const DEFAULT_CONTEXT_ROLE: &str = "student";
pub const DEFAULT_CONTEXT_INSTRUCTION: &str = "say that you are proud of him";
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Call provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub agent_id: String,
    pub base_url: String,
    pub from_phone_number: Option<String>,
    /// Fixed `variable2` sent with every call.
    pub context_role: String,
    /// Fixed `variable3` sent with every call.
    pub context_instruction: String,
}

/// Spreadsheet settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub credentials_path: PathBuf,
    pub base_url: String,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
}

/// Master configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowcallConfig {
    pub provider: ProviderConfig,
    pub sheet: SheetConfig,
    pub server: ServerConfig,
    /// Timeout applied to every outbound HTTP request.
    pub http_timeout: Duration,
    pub status_policy: StatusPolicy,
}

impl RowcallConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `api_key` or `BOLNA_API_KEY` (required)
    /// - `agent_id` or `BOLNA_AGENT_ID` (required)
    /// - `BOLNA_BASE_URL`, `BOLNA_FROM_PHONE_NUMBER`
    /// - `ROWCALL_CONTEXT_ROLE`, `ROWCALL_CONTEXT_INSTRUCTION`
    /// - `SHEET_ID` (required), `SHEET_NAME`, `SHEETS_BASE_URL`
    /// - `GOOGLE_SERVICE_ACCOUNT_KEY_PATH` (default: ./sheet.json)
    /// - `PORT` (default: 3000), `ROWCALL_BIND` (default: 0.0.0.0)
    /// - `ROWCALL_HTTP_TIMEOUT_SECS` (default: 30)
    /// - `ROWCALL_STATUS_POLICY`: "monotonic" or "last-event-wins"
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup_value(&lookup, key);
        let required = |keys: &[&str]| lookup_required(&lookup, keys);

        let provider = ProviderConfig {
            api_key: required(&["api_key", "BOLNA_API_KEY"])?,
            agent_id: required(&["agent_id", "BOLNA_AGENT_ID"])?,
            base_url: get("BOLNA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            from_phone_number: get("BOLNA_FROM_PHONE_NUMBER"),
            context_role: get("ROWCALL_CONTEXT_ROLE")
                .unwrap_or_else(|| DEFAULT_CONTEXT_ROLE.to_string()),
            context_instruction: get("ROWCALL_CONTEXT_INSTRUCTION")
                .unwrap_or_else(|| DEFAULT_CONTEXT_INSTRUCTION.to_string()),
        };

        let sheet = SheetConfig {
            spreadsheet_id: required(&["SHEET_ID"])?,
            sheet_name: get("SHEET_NAME").unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
            credentials_path: PathBuf::from(
                get("GOOGLE_SERVICE_ACCOUNT_KEY_PATH")
                    .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string()),
            ),
            base_url: get("SHEETS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                value: raw.clone(),
                reason: "must be a port number".to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let server = ServerConfig {
            bind_host: get("ROWCALL_BIND").unwrap_or_else(|| DEFAULT_BIND_HOST.to_string()),
            port,
        };

        let timeout_secs = match get("ROWCALL_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "ROWCALL_HTTP_TIMEOUT_SECS".to_string(),
                        value: raw,
                        reason: "must be a positive number of seconds".to_string(),
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let status_policy = match get("ROWCALL_STATUS_POLICY") {
            Some(raw) => StatusPolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                field: "ROWCALL_STATUS_POLICY".to_string(),
                value: raw.clone(),
                reason: "expected monotonic or last-event-wins".to_string(),
            })?,
            None => StatusPolicy::default(),
        };

        Ok(Self {
            provider,
            sheet,
            server,
            http_timeout: Duration::from_secs(timeout_secs),
            status_policy,
        })
    }
}

fn lookup_value<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn lookup_required<F>(lookup: &F, keys: &[&str]) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .find_map(|key| lookup_value(lookup, key))
        .ok_or_else(|| ConfigError::MissingRequired {
            field: keys.join(" or "),
        })
}
