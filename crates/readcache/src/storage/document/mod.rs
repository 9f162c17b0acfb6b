//! JSON document storage backend.
//!
//! Entities are persisted as `serde_json::Value` documents and decoded on
//! read with the help of an entity factory, which callers install through
//! the [`EntityFactoryAware`] capability.
//!
//! [`EntityFactoryAware`]: readcache_core::storage::EntityFactoryAware

mod repository;

pub use repository::DocumentRepository;
