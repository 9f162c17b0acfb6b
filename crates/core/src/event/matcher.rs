use super::{AggregateType, Event, EventType};

/// Selects which events a handler receives from a bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventMatcher {
    /// Every event.
    Any,
    /// Events whose type is in the list.
    Events(Vec<EventType>),
    /// Events emitted by aggregates whose type is in the list.
    Aggregates(Vec<AggregateType>),
}

impl EventMatcher {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Self::Any => true,
            Self::Events(types) => types.contains(&event.event_type),
            Self::Aggregates(types) => types.contains(&event.aggregate_type),
        }
    }
}
