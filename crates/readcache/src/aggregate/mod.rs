//! Write side: aggregate store and command handler.

mod command_handler;
mod store;

pub use command_handler::AggregateCommandHandler;
pub use store::AggregateStore;
