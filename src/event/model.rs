//! Canonical event record stored for every recognized webhook delivery

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventAction {
    /// Direct update of a branch reference
    Push,
    /// Pull request opened or updated
    PullRequest,
    /// Pull request merged into its base branch
    Merge,
}

impl EventAction {
    /// Storage/wire form of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Push => "PUSH",
            EventAction::PullRequest => "PULL_REQUEST",
            EventAction::Merge => "MERGE",
        }
    }

    /// Parse an action from its storage form
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PUSH" => Some(EventAction::Push),
            "PULL_REQUEST" => Some(EventAction::PullRequest),
            "MERGE" => Some(EventAction::Merge),
            _ => None,
        }
    }
}

/// The single record shape stored regardless of source event type
///
/// `timestamp` is the event-occurrence time reported by the source, not the
/// ingestion time. `from_branch` is `None` exactly when `action` is `Push`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub request_id: String,
    pub author: String,
    pub action: EventAction,
    pub from_branch: Option<String>,
    pub to_branch: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_action_roundtrip() {
        for action in [EventAction::Push, EventAction::PullRequest, EventAction::Merge] {
            assert_eq!(EventAction::from_str(action.as_str()), Some(action));
        }
        assert_eq!(EventAction::from_str("DELETE"), None);
    }

    #[test]
    fn test_action_wire_form() {
        assert_eq!(
            serde_json::to_string(&EventAction::PullRequest).unwrap(),
            "\"PULL_REQUEST\""
        );
    }

    #[test]
    fn test_event_serializes_all_fields() {
        let event = CanonicalEvent {
            request_id: "abc123".to_string(),
            author: "alice".to_string(),
            action: EventAction::Push,
            from_branch: None,
            to_branch: "main".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["request_id"], "abc123");
        assert_eq!(json["author"], "alice");
        assert_eq!(json["action"], "PUSH");
        assert_eq!(json["from_branch"], serde_json::Value::Null);
        assert_eq!(json["to_branch"], "main");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
    }
}
