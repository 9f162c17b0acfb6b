//! In-memory implementations of the event store and event bus contracts.

mod bus;
mod store;

pub use bus::InMemoryEventBus;
pub use store::InMemoryEventStore;
