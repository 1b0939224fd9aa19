pub mod client;
pub mod error;
pub mod generator;
pub mod parse;
pub mod types;

pub use generator::{ContentGenerator, Generator};
