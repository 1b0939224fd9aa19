pub mod client;
pub mod error;
pub mod types;

pub use client::{NotionClient, TaskQueue};
pub use error::QueueError;
