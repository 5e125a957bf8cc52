//! Postgres-backed event store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::{Client, NoTls, Row};
use tracing::error;

use super::{EventStore, StoreError};
use crate::event::{CanonicalEvent, EventAction};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS events (
    id          BIGSERIAL PRIMARY KEY,
    request_id  TEXT NOT NULL,
    author      TEXT NOT NULL,
    action      TEXT NOT NULL,
    from_branch TEXT,
    to_branch   TEXT NOT NULL,
    timestamp   TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS events_timestamp_idx ON events (timestamp DESC, id ASC);
";

const INSERT_EVENT: &str = "INSERT INTO events \
    (request_id, author, action, from_branch, to_branch, timestamp) \
    VALUES ($1, $2, $3, $4, $5, $6)";

// id breaks equal-timestamp ties in insertion order, like the memory store's
// stable sort
const SELECT_RECENT: &str = "SELECT request_id, author, action, from_branch, to_branch, timestamp \
    FROM events ORDER BY timestamp DESC, id ASC LIMIT $1";

const SELECT_AFTER: &str = "SELECT request_id, author, action, from_branch, to_branch, timestamp \
    FROM events WHERE timestamp > $1 ORDER BY timestamp DESC, id ASC";

/// Event store over a single pipelined Postgres connection
pub struct PgEventStore {
    client: Client,
}

impl PgEventStore {
    /// Connect, spawn the connection driver task and make sure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

        // The driver task owns the socket; once it stops, every client call
        // surfaces a database error to the caller
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("Postgres connection error: {}", e);
            }
        });

        client.batch_execute(SCHEMA).await?;

        Ok(Self { client })
    }
}

fn row_to_event(row: &Row) -> Result<CanonicalEvent, StoreError> {
    let action_str: String = row.get("action");
    let action =
        EventAction::from_str(&action_str).ok_or_else(|| StoreError::InvalidAction(action_str))?;

    Ok(CanonicalEvent {
        request_id: row.get("request_id"),
        author: row.get("author"),
        action,
        from_branch: row.get("from_branch"),
        to_branch: row.get("to_branch"),
        timestamp: row.get("timestamp"),
    })
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn append(&self, event: &CanonicalEvent) -> Result<(), StoreError> {
        self.client
            .execute(
                INSERT_EVENT,
                &[
                    &event.request_id,
                    &event.author,
                    &event.action.as_str(),
                    &event.from_branch,
                    &event.to_branch,
                    &event.timestamp,
                ],
            )
            .await?;
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<CanonicalEvent>, StoreError> {
        let rows = self.client.query(SELECT_RECENT, &[&limit]).await?;
        rows.iter().map(row_to_event).collect()
    }

    async fn after(&self, cutoff: DateTime<Utc>) -> Result<Vec<CanonicalEvent>, StoreError> {
        let rows = self.client.query(SELECT_AFTER, &[&cutoff]).await?;
        rows.iter().map(row_to_event).collect()
    }
}
