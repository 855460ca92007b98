//! Packs module: catalog CRUD and pack assignment

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
