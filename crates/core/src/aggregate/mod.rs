mod error;
mod traits;

pub use error::{AggregateError, CommandError, Result};
pub use traits::{Aggregate, Command, CommandHandler, PendingEvent};
