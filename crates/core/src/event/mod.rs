mod error;
mod matcher;
mod traits;
mod types;

pub use error::{EventBusError, EventHandlerError, EventStoreError, Result};
pub use matcher::EventMatcher;
pub use traits::{EventBus, EventHandler, EventStore};
pub use types::{AggregateType, Event, EventHandlerType, EventType};
