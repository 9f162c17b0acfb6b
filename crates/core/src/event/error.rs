use thiserror::Error;
use uuid::Uuid;

use crate::storage::RepositoryError;

use super::{EventHandlerType, EventType};

/// Errors returned by event handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventHandlerError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Cannot project {event_type}: {reason}")]
    Projection { event_type: EventType, reason: String },
}

/// Errors that can occur when registering handlers or publishing events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventBusError {
    #[error("Handler already added: {0}")]
    HandlerAlreadyAdded(EventHandlerType),
    #[error("Handler {handler_type} failed: {source}")]
    Handler {
        handler_type: EventHandlerType,
        #[source]
        source: EventHandlerError,
    },
}

/// Errors that can occur when saving or loading events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventStoreError {
    #[error("No events to save")]
    NoEvents,
    #[error("Events belong to more than one aggregate")]
    MixedAggregates,
    #[error("Version conflict for aggregate {aggregate_id}: expected {expected}, stored {actual}")]
    VersionConflict {
        aggregate_id: Uuid,
        expected: u64,
        actual: u64,
    },
    #[error("Invalid event version: expected {expected}, got {actual}")]
    InvalidVersion { expected: u64, actual: u64 },
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
