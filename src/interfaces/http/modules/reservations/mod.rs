//! Reservations module: standalone bookings and the reservation lifecycle

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
