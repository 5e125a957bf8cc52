//! In-memory event store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{EventStore, StoreError};
use crate::event::CanonicalEvent;

/// Vec-backed store; insertion order is preserved and reads sort on the way out
pub struct MemoryEventStore {
    events: RwLock<Vec<CanonicalEvent>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_descending(events: &mut [CanonicalEvent]) {
    // Stable sort keeps insertion order among equal timestamps
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, event: &CanonicalEvent) -> Result<(), StoreError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<CanonicalEvent>, StoreError> {
        let mut events = self.events.read().await.clone();
        sort_descending(&mut events);
        events.truncate(limit.max(0) as usize);
        Ok(events)
    }

    async fn after(&self, cutoff: DateTime<Utc>) -> Result<Vec<CanonicalEvent>, StoreError> {
        let mut events: Vec<CanonicalEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.timestamp > cutoff)
            .cloned()
            .collect();
        sort_descending(&mut events);
        Ok(events)
    }
}
