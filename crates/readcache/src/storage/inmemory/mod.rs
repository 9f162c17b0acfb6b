//! In-memory storage backend.
//!
//! Stores entities in namespaced HashMaps wrapped in `Arc<RwLock<_>>`. Useful
//! for tests, demos and single-process deployments where persistence is not
//! required.
//!
//! # Example
//!
//! ```rust,ignore
//! use readcache::storage::InMemoryRepository;
//!
//! let repo = InMemoryRepository::<TodoList>::new();
//! repo.save(&ctx, &list).await?;
//! ```

mod repository;

pub use repository::InMemoryRepository;
