//! Call provider payloads: outbound initiation and inbound webhook events.

use serde::{Deserialize, Serialize};

use crate::{CallStatus, ValidationError};

/// Per-call context handed to the voice agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub variable1: String,
    pub variable2: String,
    pub variable3: String,
}

/// Call-initiation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub agent_id: String,
    pub recipient_phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_phone_number: Option<String>,
    pub scheduled_at: Option<String>,
    pub user_data: UserData,
}

/// Provider acknowledgement of an initiated call.
///
/// Every field defaults to empty when the provider omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallInitiated {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub message: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub execution_id: String,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Webhook event as delivered by the provider.
///
/// Only the fields the reconciler reads are modelled; the rest of the
/// provider payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub extracted_data: Option<serde_json::Value>,
}

/// What a validated webhook event asks the reconciler to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Completed {
        transcript: Option<String>,
        extracted_interest: Option<String>,
    },
    Progress {
        status: String,
        error_message: Option<String>,
    },
}

/// A webhook event that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    pub call_id: String,
    pub outcome: CallOutcome,
}

impl ValidatedEvent {
    pub fn status(&self) -> CallStatus {
        match &self.outcome {
            CallOutcome::Completed { .. } => CallStatus::Completed,
            CallOutcome::Progress { status, .. } => CallStatus::parse(status),
        }
    }

    /// Value written to the `call_status` column.
    pub fn status_text(&self) -> &str {
        match &self.outcome {
            CallOutcome::Completed { .. } => CallStatus::Completed.as_str(),
            CallOutcome::Progress { status, .. } => status,
        }
    }
}

impl CallEvent {
    pub fn validate(&self) -> Result<ValidatedEvent, ValidationError> {
        // The id is matched against the sheet byte for byte.
        let call_id = self
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ValidationError::RequiredFieldMissing {
                field: "id".to_string(),
            })?;
        let status = non_blank(self.status.as_deref()).ok_or_else(|| {
            ValidationError::RequiredFieldMissing {
                field: "status".to_string(),
            }
        })?;

        let outcome = if CallStatus::parse(&status) == CallStatus::Completed {
            CallOutcome::Completed {
                transcript: non_blank(self.transcript.as_deref()),
                extracted_interest: self.extracted_interest(),
            }
        } else {
            CallOutcome::Progress {
                status,
                error_message: non_blank(self.error_message.as_deref()),
            }
        };

        Ok(ValidatedEvent { call_id, outcome })
    }

    /// `extracted_data.user_interest`, if the provider sent a usable one.
    pub fn extracted_interest(&self) -> Option<String> {
        let interest = self.extracted_data.as_ref()?.get("user_interest")?;
        match interest {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Bool(_) | serde_json::Value::Number(_) => Some(interest.to_string()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
