//! Rooms module: room listing and daily availability

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
