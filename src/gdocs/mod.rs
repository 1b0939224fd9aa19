pub mod auth;
pub mod client;
pub mod error;
pub mod publisher;

pub use publisher::{DocPublisher, Publisher};
