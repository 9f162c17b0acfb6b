use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::context::Context;

use super::{Event, EventBusError, EventHandlerError, EventHandlerType, EventMatcher, Result};

/// Consumer of events delivered by an [`EventBus`].
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Identity of the handler. Must be unique per registration on a bus.
    fn handler_type(&self) -> EventHandlerType;

    /// Handles one event.
    async fn handle_event(
        &self,
        ctx: &Context,
        event: &Event,
    ) -> std::result::Result<(), EventHandlerError>;
}

/// Delivers published events to the handlers whose matcher accepts them.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Registers a handler for every event accepted by `matcher`.
    async fn add_handler(
        &self,
        ctx: &Context,
        matcher: EventMatcher,
        handler: Arc<dyn EventHandler>,
    ) -> std::result::Result<(), EventBusError>;

    /// Delivers an event to every matching handler.
    async fn publish(&self, ctx: &Context, event: &Event) -> std::result::Result<(), EventBusError>;
}

/// Append-only log of aggregate events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends events for one aggregate whose stream is currently at
    /// `original_version`.
    async fn save(&self, ctx: &Context, events: &[Event], original_version: u64) -> Result<()>;

    /// Loads the full stream of an aggregate. Unknown aggregates yield an
    /// empty stream.
    async fn load(&self, ctx: &Context, aggregate_id: Uuid) -> Result<Vec<Event>>;
}
