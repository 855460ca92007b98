//! Directory of sedes, rooms and users
//!
//! Owned by the wider platform; this service reads it to validate requests.

pub mod model;
pub mod repository;

pub use model::{Room, Sede, User, UserRole};
pub use repository::{RoomRepository, UserRepository};
