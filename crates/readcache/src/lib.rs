//! Event-invalidated caching for CQRS read-model repositories.
//!
//! [`cache::CachedRepository`] wraps any read-model repository with a
//! namespaced in-memory cache and evicts entries when it receives events for
//! them on the event bus. The remaining modules provide the pieces needed to
//! run it end to end: storage backends, an in-memory event store and bus, an
//! aggregate command handler, a read-model projector, and an example todo
//! list domain.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod domain;
pub mod eventing;
pub mod projector;
pub mod storage;

#[cfg(test)]
mod testing;
