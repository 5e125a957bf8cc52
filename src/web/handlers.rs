//! Request handlers for webhook ingestion and polling reads

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::DEFAULT_EVENTS_LIMIT;
use crate::event::{normalize, parse_timestamp};
use crate::AppState;

/// Acknowledgment body sent for every accepted delivery
fn ack() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

fn error_body(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "error": message.into() }))
}

/// Receive one GitHub webhook delivery
///
/// Deliveries the service does not track (unknown event types, irrelevant
/// pull-request actions) are acknowledged with success so the sender does not
/// retry them.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    // The body must parse as a JSON document before the normalizer runs
    let payload = match payload {
        Ok(Json(value)) if !value.is_null() => value,
        _ => return (StatusCode::BAD_REQUEST, error_body("Invalid payload")),
    };

    let event_type = headers
        .get("x-github-event")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let event = match normalize(event_type, payload) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!("Ignoring {:?} delivery", event_type);
            return (StatusCode::OK, ack());
        }
        Err(e) => return (StatusCode::UNPROCESSABLE_ENTITY, error_body(e.to_string())),
    };

    match state.store.append(&event).await {
        Ok(()) => {
            info!(
                "Stored {} event {} by {}",
                event.action.as_str(),
                event.request_id,
                event.author
            );
            (StatusCode::OK, ack())
        }
        Err(e) => {
            error!("Failed to append event: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, error_body(e.to_string()))
        }
    }
}

#[derive(Deserialize)]
pub struct EventsQuery {
    /// Newest timestamp the polling client has already rendered
    since: Option<String>,
}

/// List recent events for the polling client
///
/// Without `since`, the most recent records up to the fixed default limit;
/// with `since`, only records strictly newer than the cursor.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Response {
    let result = match query.since.as_deref() {
        Some(raw) => match parse_timestamp(raw) {
            Ok(cutoff) => state.store.after(cutoff).await,
            Err(_) => {
                return (StatusCode::BAD_REQUEST, error_body("Invalid since parameter"))
                    .into_response()
            }
        },
        None => state.store.recent(DEFAULT_EVENTS_LIMIT).await,
    };

    match result {
        Ok(events) => Json(events).into_response(),
        Err(e) => {
            error!("Failed to query events: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, error_body(e.to_string())).into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
