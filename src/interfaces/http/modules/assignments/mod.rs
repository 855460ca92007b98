//! Assignments module: lookup and cancellation of pack assignments

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
