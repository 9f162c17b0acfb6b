//! Command handler for event-sourced aggregates.

use std::marker::PhantomData;

use async_trait::async_trait;

use readcache_core::aggregate::{Aggregate, Command, CommandError, CommandHandler, Result};
use readcache_core::context::{namespace_of, Context};

use super::AggregateStore;

/// Dispatches commands to aggregates of type `A`.
///
/// Loads the target aggregate, lets it validate the command, and saves the
/// resulting events through the [`AggregateStore`]. Commands that produce no
/// events leave the stream untouched.
pub struct AggregateCommandHandler<A> {
    store: AggregateStore,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A: Aggregate> AggregateCommandHandler<A> {
    pub fn new(store: AggregateStore) -> Self {
        Self {
            store,
            _aggregate: PhantomData,
        }
    }
}

#[async_trait]
impl<A: Aggregate> CommandHandler<A::Command> for AggregateCommandHandler<A> {
    async fn handle_command(&self, ctx: &Context, command: A::Command) -> Result<()> {
        let id = command.aggregate_id();
        if id.is_nil() {
            return Err(CommandError::MissingAggregateId);
        }

        let (aggregate, version) = self.store.load::<A>(ctx, id).await?;
        let pending = aggregate.handle_command(&command)?;
        if pending.is_empty() {
            tracing::debug!(
                aggregate_id = %id,
                command = command.command_type(),
                "Command produced no events"
            );
            return Ok(());
        }

        let events = self.store.save::<A>(ctx, id, version, pending).await?;
        tracing::debug!(
            namespace = %namespace_of(ctx),
            aggregate_type = %A::AGGREGATE_TYPE,
            aggregate_id = %id,
            command = command.command_type(),
            events = events.len(),
            "Command handled"
        );
        Ok(())
    }
}
