//! Event-sourced aggregate store.

use std::sync::Arc;

use uuid::Uuid;

use readcache_core::aggregate::{Aggregate, PendingEvent, Result};
use readcache_core::context::Context;
use readcache_core::event::{Event, EventBus, EventStore};

/// Loads aggregates by replaying their events and persists new events,
/// publishing them on the bus once stored.
#[derive(Clone)]
pub struct AggregateStore {
    event_store: Arc<dyn EventStore>,
    event_bus: Arc<dyn EventBus>,
}

impl AggregateStore {
    pub fn new(event_store: Arc<dyn EventStore>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            event_store,
            event_bus,
        }
    }

    /// Rebuilds an aggregate. Returns it with the version of its last event,
    /// or a default aggregate at version 0 if it has no events.
    pub async fn load<A: Aggregate>(&self, ctx: &Context, id: Uuid) -> Result<(A, u64)> {
        let events = self.event_store.load(ctx, id).await?;

        let mut aggregate = A::default();
        let mut version = 0;
        for event in &events {
            aggregate.apply_event(event)?;
            version = event.version;
        }

        Ok((aggregate, version))
    }

    /// Stores `pending` after `version` and publishes the stored events.
    pub async fn save<A: Aggregate>(
        &self,
        ctx: &Context,
        id: Uuid,
        version: u64,
        pending: Vec<PendingEvent>,
    ) -> Result<Vec<Event>> {
        let events: Vec<Event> = pending
            .into_iter()
            .zip(version + 1..)
            .map(|(pending, version)| {
                Event::new(pending.event_type, A::AGGREGATE_TYPE, id, version, pending.data)
            })
            .collect();

        self.event_store.save(ctx, &events, version).await?;

        for event in &events {
            self.event_bus.publish(ctx, event).await?;
        }

        Ok(events)
    }
}
