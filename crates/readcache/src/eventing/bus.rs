//! In-process event bus.
//!
//! Handlers are registered with an [`EventMatcher`] and called in
//! registration order for every published event they match. Delivery is
//! awaited: when `publish` returns, every matching handler has run.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use readcache_core::context::Context;
use readcache_core::event::{Event, EventBus, EventBusError, EventHandler, EventMatcher};

struct Registration {
    matcher: EventMatcher,
    handler: Arc<dyn EventHandler>,
}

/// In-memory event bus for single-process deployments.
#[derive(Default)]
pub struct InMemoryEventBus {
    registrations: RwLock<Vec<Registration>>,
}

impl InMemoryEventBus {
    /// Creates a bus without handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered handlers.
    pub async fn handler_count(&self) -> usize {
        self.registrations.read().await.len()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn add_handler(
        &self,
        _ctx: &Context,
        matcher: EventMatcher,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), EventBusError> {
        let handler_type = handler.handler_type();
        let mut registrations = self.registrations.write().await;
        if registrations
            .iter()
            .any(|r| r.handler.handler_type() == handler_type)
        {
            return Err(EventBusError::HandlerAlreadyAdded(handler_type));
        }

        tracing::debug!(%handler_type, ?matcher, "Event handler added");
        registrations.push(Registration { matcher, handler });
        Ok(())
    }

    async fn publish(&self, ctx: &Context, event: &Event) -> Result<(), EventBusError> {
        // Snapshot the matching handlers so none are called under the lock
        let handlers: Vec<Arc<dyn EventHandler>> = {
            let registrations = self.registrations.read().await;
            registrations
                .iter()
                .filter(|r| r.matcher.matches(event))
                .map(|r| r.handler.clone())
                .collect()
        };

        tracing::trace!(%event, handlers = handlers.len(), "Publishing event");

        // Every handler runs even if an earlier one failed; the first
        // failure is reported.
        let mut first_error = None;
        for handler in handlers {
            if let Err(source) = handler.handle_event(ctx, event).await {
                let handler_type = handler.handler_type();
                tracing::warn!(%handler_type, %event, error = %source, "Event handler failed");
                first_error.get_or_insert(EventBusError::Handler {
                    handler_type,
                    source,
                });
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
