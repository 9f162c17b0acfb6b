//! Example domains wired on top of the cached read models.

pub mod todo;
