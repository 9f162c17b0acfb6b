use thiserror::Error;

use crate::event::{EventBusError, EventStoreError, EventType};

/// Errors raised by aggregates while handling commands or applying events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Command rejected: {0}")]
    Rejected(String),
    #[error("Cannot apply {event_type}: {reason}")]
    Apply { event_type: EventType, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AggregateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors that can occur when dispatching a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Missing aggregate ID")]
    MissingAggregateId,
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    EventStore(#[from] EventStoreError),
    #[error(transparent)]
    EventBus(#[from] EventBusError),
}

/// Result type for command dispatch.
pub type Result<T> = std::result::Result<T, CommandError>;
