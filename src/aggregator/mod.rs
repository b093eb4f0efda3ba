//! Queue Aggregator Lambda: a non-destructive view over both priority queues.

pub mod handler;
pub mod read;

pub use handler::handler;
pub use read::{PEEK_OPTIONS, QueueAggregator};
