//! Payments module: monthly dues of pack assignments

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
