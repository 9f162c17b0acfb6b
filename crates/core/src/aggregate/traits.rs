use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::context::Context;
use crate::event::{AggregateType, Event, EventType};

use super::{AggregateError, Result};

/// An instruction addressed to one aggregate.
pub trait Command: Debug + Send + Sync {
    /// The aggregate the command is addressed to.
    fn aggregate_id(&self) -> Uuid;

    /// Name of the command, used in logs.
    fn command_type(&self) -> &'static str;
}

/// An event produced by an aggregate but not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEvent {
    pub event_type: EventType,
    pub data: serde_json::Value,
}

impl PendingEvent {
    /// Creates a pending event with a serialized payload.
    pub fn new<T: Serialize>(
        event_type: EventType,
        data: &T,
    ) -> std::result::Result<Self, AggregateError> {
        Ok(Self {
            event_type,
            data: serde_json::to_value(data)?,
        })
    }

    /// Creates a pending event without a payload.
    pub fn empty(event_type: EventType) -> Self {
        Self {
            event_type,
            data: serde_json::Value::Null,
        }
    }
}

/// Write-side consistency boundary rebuilt from its events.
pub trait Aggregate: Default + Send + Sync + 'static {
    type Command: Command;

    const AGGREGATE_TYPE: AggregateType;

    /// Validates a command against the current state and returns the events
    /// it produces. Must not change state; state changes happen in
    /// [`Aggregate::apply_event`].
    fn handle_command(
        &self,
        command: &Self::Command,
    ) -> std::result::Result<Vec<PendingEvent>, AggregateError>;

    /// Folds one stored event into the state.
    fn apply_event(&mut self, event: &Event) -> std::result::Result<(), AggregateError>;
}

/// Entry point of the write side.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle_command(&self, ctx: &Context, command: C) -> Result<()>;
}
