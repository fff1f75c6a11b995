//! Error types for ROWCALL operations

use thiserror::Error;

/// Row store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Row store request failed: {reason}")]
    Transport { reason: String },

    #[error("Row store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from row store: {reason}")]
    Decode { reason: String },

    #[error("Row store authentication failed: {reason}")]
    Auth { reason: String },

    #[error("Unable to load credentials from {path}: {reason}")]
    Credentials { path: String, reason: String },

    #[error("Row {position} is outside the stored range")]
    RowOutOfRange { position: u32 },

    #[error("Row store lock poisoned")]
    LockPoisoned,
}

/// Call provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Request to {provider} failed: {reason}")]
    Transport { provider: String, reason: String },

    #[error("Request to {provider} failed with status {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    Decode { provider: String, reason: String },
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all ROWCALL errors.
#[derive(Debug, Clone, Error)]
pub enum RowcallError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for ROWCALL operations.
pub type RowcallResult<T> = Result<T, RowcallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_status() {
        let err = StoreError::Status {
            status: 403,
            body: "PERMISSION_DENIED".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("403"));
        assert!(msg.contains("PERMISSION_DENIED"));
    }

    #[test]
    fn test_provider_error_display_status() {
        let err = ProviderError::Status {
            provider: "bolna".to_string(),
            status: 502,
            body: "bad gateway".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("bolna"));
        assert!(msg.contains("502"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "PORT".to_string(),
            value: "abc".to_string(),
            reason: "must be a port number".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("PORT"));
        assert!(msg.contains("abc"));
        assert!(msg.contains("must be a port number"));
    }

    #[test]
    fn test_rowcall_error_from_variants() {
        let store = RowcallError::from(StoreError::LockPoisoned);
        assert!(matches!(store, RowcallError::Store(_)));

        let provider = RowcallError::from(ProviderError::Transport {
            provider: "bolna".to_string(),
            reason: "timeout".to_string(),
        });
        assert!(matches!(provider, RowcallError::Provider(_)));

        let validation = RowcallError::from(ValidationError::RequiredFieldMissing {
            field: "id".to_string(),
        });
        assert!(matches!(validation, RowcallError::Validation(_)));

        let config = RowcallError::from(ConfigError::MissingRequired {
            field: "SHEET_ID".to_string(),
        });
        assert!(matches!(config, RowcallError::Config(_)));
    }
}
