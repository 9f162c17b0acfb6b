//! Todo list domain.
//!
//! Event-sourced write side ([`TodoAggregate`]) and a [`TodoList`] read model
//! kept up to date by a projector.

mod aggregate;
mod commands;
mod entity;
pub mod events;
mod projection;
mod setup;

pub use aggregate::TodoAggregate;
pub use commands::TodoCommand;
pub use entity::{TodoItem, TodoList};
pub use projection::TodoProjection;
pub use setup::{setup_domain, SetupError};
