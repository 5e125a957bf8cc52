//! Normalization of webhook deliveries into canonical records
//!
//! Pure classification: no storage, no I/O. Deliveries the service does not
//! care about come back as `Ok(None)` rather than an error.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::model::{CanonicalEvent, EventAction};
use super::payload::{PullRequestPayload, PushPayload};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid timestamp in {field}: {source}")]
    InvalidTimestamp {
        field: &'static str,
        source: chrono::ParseError,
    },

    #[error("missing timestamp field {0}")]
    MissingTimestamp(&'static str),
}

/// Parse a source timestamp (ISO-8601, optionally `Z`-suffixed)
///
/// The `Z` designator is rewritten to `+00:00` before parsing so the parsed
/// instant always carries an explicit UTC offset.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let explicit = raw.replace('Z', "+00:00");
    DateTime::parse_from_rfc3339(&explicit).map(|dt| dt.with_timezone(&Utc))
}

fn parse_timestamp_field(
    raw: &str,
    field: &'static str,
) -> Result<DateTime<Utc>, NormalizeError> {
    parse_timestamp(raw).map_err(|source| NormalizeError::InvalidTimestamp { field, source })
}

/// Normalize one webhook delivery into a canonical record
///
/// `Ok(None)` means the delivery is deliberately ignored: an unknown event
/// type, an irrelevant pull-request action (including closed-without-merge),
/// or a payload that does not match the expected shape. A malformed timestamp
/// on an otherwise-valid event is a hard error.
pub fn normalize(
    event_type: &str,
    payload: Value,
) -> Result<Option<CanonicalEvent>, NormalizeError> {
    match event_type {
        "push" => match serde_json::from_value::<PushPayload>(payload) {
            Ok(push) => normalize_push(push).map(Some),
            Err(_) => Ok(None),
        },
        "pull_request" => match serde_json::from_value::<PullRequestPayload>(payload) {
            Ok(pr) => normalize_pull_request(pr),
            Err(_) => Ok(None),
        },
        _ => Ok(None),
    }
}

fn normalize_push(payload: PushPayload) -> Result<CanonicalEvent, NormalizeError> {
    // refs/heads/main -> main
    let to_branch = payload
        .git_ref
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(CanonicalEvent {
        request_id: payload.head_commit.id,
        author: payload.pusher.name,
        action: EventAction::Push,
        from_branch: None,
        to_branch,
        timestamp: parse_timestamp_field(&payload.head_commit.timestamp, "head_commit.timestamp")?,
    })
}

fn normalize_pull_request(
    payload: PullRequestPayload,
) -> Result<Option<CanonicalEvent>, NormalizeError> {
    let pr = payload.pull_request;

    let (action, timestamp) = match payload.action.as_str() {
        "opened" | "synchronize" => (
            EventAction::PullRequest,
            parse_timestamp_field(&pr.created_at, "created_at")?,
        ),
        "closed" if pr.merged => {
            let merged_at = pr
                .merged_at
                .as_deref()
                .ok_or(NormalizeError::MissingTimestamp("merged_at"))?;
            (EventAction::Merge, parse_timestamp_field(merged_at, "merged_at")?)
        }
        _ => return Ok(None),
    };

    Ok(Some(CanonicalEvent {
        request_id: pr.id.to_string(),
        author: pr.user.login,
        action,
        from_branch: Some(pr.head.name),
        to_branch: pr.base.name,
        timestamp,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn push_payload() -> Value {
        json!({
            "ref": "refs/heads/main",
            "pusher": { "name": "alice" },
            "head_commit": { "id": "abc123", "timestamp": "2024-01-01T00:00:00Z" }
        })
    }

    fn pull_request_payload(action: &str, merged: bool, merged_at: Option<&str>) -> Value {
        json!({
            "action": action,
            "pull_request": {
                "id": 42,
                "user": { "login": "bob" },
                "head": { "ref": "feature-x" },
                "base": { "ref": "main" },
                "created_at": "2024-01-02T10:00:00Z",
                "merged": merged,
                "merged_at": merged_at
            }
        })
    }

    #[test]
    fn test_push_produces_canonical_record() {
        let event = normalize("push", push_payload()).unwrap().unwrap();

        assert_eq!(event.request_id, "abc123");
        assert_eq!(event.author, "alice");
        assert_eq!(event.action, EventAction::Push);
        assert_eq!(event.from_branch, None);
        assert_eq!(event.to_branch, "main");
        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_push_keeps_final_ref_segment() {
        let payload = json!({
            "ref": "refs/heads/release/v2",
            "pusher": { "name": "alice" },
            "head_commit": { "id": "def456", "timestamp": "2024-01-01T00:00:00Z" }
        });

        let event = normalize("push", payload).unwrap().unwrap();
        assert_eq!(event.to_branch, "v2");
    }

    #[test]
    fn test_opened_pull_request() {
        let event = normalize("pull_request", pull_request_payload("opened", false, None))
            .unwrap()
            .unwrap();

        assert_eq!(event.request_id, "42");
        assert_eq!(event.author, "bob");
        assert_eq!(event.action, EventAction::PullRequest);
        assert_eq!(event.from_branch.as_deref(), Some("feature-x"));
        assert_eq!(event.to_branch, "main");
        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_synchronize_pull_request() {
        let event = normalize(
            "pull_request",
            pull_request_payload("synchronize", false, None),
        )
        .unwrap()
        .unwrap();

        assert_eq!(event.action, EventAction::PullRequest);
    }

    #[test]
    fn test_merged_pull_request_uses_merge_time() {
        let event = normalize(
            "pull_request",
            pull_request_payload("closed", true, Some("2024-01-03T12:00:00Z")),
        )
        .unwrap()
        .unwrap();

        assert_eq!(event.action, EventAction::Merge);
        assert_eq!(event.request_id, "42");
        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_closed_without_merge_yields_no_record() {
        let result = normalize("pull_request", pull_request_payload("closed", false, None));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_unknown_event_type_yields_no_record() {
        let result = normalize("issues", json!({ "action": "opened" }));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_unrecognized_pr_action_yields_no_record() {
        let result = normalize("pull_request", pull_request_payload("labeled", false, None));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_mismatched_push_shape_yields_no_record() {
        let payload = json!({
            "ref": "refs/heads/old-branch",
            "pusher": { "name": "alice" },
            "head_commit": null
        });

        let result = normalize("push", payload);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_malformed_timestamp_is_hard_error() {
        let payload = json!({
            "ref": "refs/heads/main",
            "pusher": { "name": "alice" },
            "head_commit": { "id": "abc123", "timestamp": "not-a-date" }
        });

        let result = normalize("push", payload);
        assert!(matches!(
            result,
            Err(NormalizeError::InvalidTimestamp { field: "head_commit.timestamp", .. })
        ));
    }

    #[test]
    fn test_merged_without_merged_at_is_hard_error() {
        let result = normalize("pull_request", pull_request_payload("closed", true, None));
        assert!(matches!(
            result,
            Err(NormalizeError::MissingTimestamp("merged_at"))
        ));
    }

    #[test]
    fn test_parse_timestamp_accepts_z_and_offset_forms() {
        let from_z = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        let from_offset = parse_timestamp("2024-01-01T05:30:00+05:30").unwrap();

        assert_eq!(from_z, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(from_offset, from_z);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
