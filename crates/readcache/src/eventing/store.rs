//! In-memory event store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use readcache_core::context::{namespace_of, Context, Namespace};
use readcache_core::event::{Event, EventStore, EventStoreError, Result};

/// Append-only event streams, one per aggregate and namespace.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<Namespace, HashMap<Uuid, Vec<Event>>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Checks that a batch targets one aggregate and continues its stream.
fn validate_batch(events: &[Event], original_version: u64) -> Result<Uuid> {
    let first = events.first().ok_or(EventStoreError::NoEvents)?;

    for (offset, event) in events.iter().enumerate() {
        if event.aggregate_id != first.aggregate_id {
            return Err(EventStoreError::MixedAggregates);
        }
        let expected = original_version + offset as u64 + 1;
        if event.version != expected {
            return Err(EventStoreError::InvalidVersion {
                expected,
                actual: event.version,
            });
        }
    }

    Ok(first.aggregate_id)
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save(&self, ctx: &Context, events: &[Event], original_version: u64) -> Result<()> {
        let aggregate_id = validate_batch(events, original_version)?;

        let mut streams = self.streams.write().await;
        let stream = streams
            .entry(namespace_of(ctx))
            .or_default()
            .entry(aggregate_id)
            .or_default();

        let current = stream.len() as u64;
        if current != original_version {
            return Err(EventStoreError::VersionConflict {
                aggregate_id,
                expected: original_version,
                actual: current,
            });
        }

        stream.extend_from_slice(events);
        tracing::trace!(
            %aggregate_id,
            count = events.len(),
            version = stream.len(),
            "Events appended"
        );
        Ok(())
    }

    async fn load(&self, ctx: &Context, aggregate_id: Uuid) -> Result<Vec<Event>> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(&namespace_of(ctx))
            .and_then(|aggregates| aggregates.get(&aggregate_id))
            .cloned()
            .unwrap_or_default())
    }
}
