//! Event store gateway
//!
//! Current implementation persists to Postgres. The trait keeps the engine
//! swappable; `MemoryEventStore` backs tests and database-free runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::CanonicalEvent;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("stored record carries unknown action {0:?}")]
    InvalidAction(String),
}

/// Append-only store of canonical events with reverse-chronological reads
///
/// Reads sort by `timestamp` descending; records with equal timestamps come
/// back in insertion order.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append exactly one record. Never merges or deduplicates: repeated
    /// deliveries and PULL_REQUEST-then-MERGE pairs for the same request id
    /// are all retained as distinct entries.
    async fn append(&self, event: &CanonicalEvent) -> Result<(), StoreError>;

    /// Most recent records, sorted by `timestamp` descending, at most `limit`
    async fn recent(&self, limit: i64) -> Result<Vec<CanonicalEvent>, StoreError>;

    /// All records with `timestamp` strictly greater than `cutoff`, sorted by
    /// `timestamp` descending
    async fn after(&self, cutoff: DateTime<Utc>) -> Result<Vec<CanonicalEvent>, StoreError>;
}
