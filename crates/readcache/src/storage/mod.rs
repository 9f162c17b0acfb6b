//! Repository backends and decorators.
//!
//! Implementations of the repository traits defined in
//! `readcache_core::storage`:
//!
//! - [`InMemoryRepository`]: namespaced HashMap store
//! - [`DocumentRepository`]: namespaced JSON document store that decodes
//!   through an entity factory
//! - [`InstrumentedRepository`]: decorator that traces and counts calls
//!
//! The caching decorator lives in [`crate::cache`].

pub mod document;
pub mod inmemory;
mod instrumented;

pub use document::DocumentRepository;
pub use inmemory::InMemoryRepository;
pub use instrumented::{CallCounts, InstrumentedRepository};
