//! Core types and contracts for readcache.
//!
//! Everything here is backend-agnostic: repositories, event stores and buses
//! are traits, implemented by the `readcache` crate.

pub mod aggregate;
pub mod context;
pub mod entity;
pub mod event;
pub mod storage;
