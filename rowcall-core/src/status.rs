//! Call lifecycle status as stored in the `call_status` column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed view of the `call_status` column.
///
/// Provider statuses this crate does not know about are kept verbatim in
/// `Other` so they round-trip through the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallStatus {
    /// Never dispatched (empty cell).
    Pending,
    Initiated,
    Queued,
    Ringing,
    InProgress,
    Completed,
    Failed,
    Busy,
    NoAnswer,
    Canceled,
    Other(String),
}

impl CallStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => CallStatus::Pending,
            "initiated" => CallStatus::Initiated,
            "queued" => CallStatus::Queued,
            "ringing" => CallStatus::Ringing,
            "in-progress" | "in_progress" => CallStatus::InProgress,
            "completed" => CallStatus::Completed,
            "failed" | "error" => CallStatus::Failed,
            "busy" => CallStatus::Busy,
            "no-answer" | "no_answer" => CallStatus::NoAnswer,
            "canceled" | "cancelled" => CallStatus::Canceled,
            _ => CallStatus::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Pending => "",
            CallStatus::Initiated => "initiated",
            CallStatus::Queued => "queued",
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in-progress",
            CallStatus::Completed => "completed",
            CallStatus::Failed => "failed",
            CallStatus::Busy => "busy",
            CallStatus::NoAnswer => "no-answer",
            CallStatus::Canceled => "canceled",
            CallStatus::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallStatus::Completed
                | CallStatus::Failed
                | CallStatus::Busy
                | CallStatus::NoAnswer
                | CallStatus::Canceled
        )
    }

    /// Position in the lifecycle: pending < initiated < intermediate < terminal.
    ///
    /// Unknown provider statuses rank as intermediate.
    pub fn rank(&self) -> u8 {
        match self {
            CallStatus::Pending => 0,
            CallStatus::Initiated => 1,
            status if status.is_terminal() => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CallStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CallStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(CallStatus::parse(&raw))
    }
}

/// How the reconciler treats a status that would move a row backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusPolicy {
    /// Never move a row to a lower lifecycle rank, and never replace a
    /// terminal status with a different one.
    #[default]
    Monotonic,
    /// Apply every event in arrival order.
    LastEventWins,
}

impl StatusPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Some(StatusPolicy::Monotonic),
            "last-event-wins" | "last_event_wins" => Some(StatusPolicy::LastEventWins),
            _ => None,
        }
    }

    /// Whether a row currently at `current` may move to `next`.
    pub fn permits(self, current: &CallStatus, next: &CallStatus) -> bool {
        match self {
            StatusPolicy::LastEventWins => true,
            StatusPolicy::Monotonic => {
                if current.is_terminal() {
                    return current == next;
                }
                next.rank() >= current.rank()
            }
        }
    }
}
