//! Pack catalog aggregate

pub mod model;
pub mod repository;

pub use model::PackDefinition;
pub use repository::PackRepository;
