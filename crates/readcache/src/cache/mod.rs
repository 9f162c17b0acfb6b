//! Event-invalidated read-model cache.
//!
//! [`CachedRepository`] decorates a repository with a namespaced in-memory
//! cache. It implements the repository traits, so it is a drop-in
//! substitute, and [`EventHandler`] so it can subscribe to the event bus
//! and evict entries changed elsewhere.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let repo = Arc::new(InMemoryRepository::<TodoList>::new());
//! let cached = Arc::new(CachedRepository::new(repo));
//!
//! event_bus
//!     .add_handler(&ctx, EventMatcher::Aggregates(vec![TODO_LIST]), cached.clone())
//!     .await?;
//! ```
//!
//! [`EventHandler`]: readcache_core::event::EventHandler

mod locator;
mod repository;
mod store;

pub use locator::{locate, MAX_CHAIN_DEPTH};
pub use repository::CachedRepository;
pub use store::CacheStore;
