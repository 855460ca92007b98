pub mod assignments;
pub mod health;
pub mod metrics;
pub mod packs;
pub mod payments;
pub mod request_id;
pub mod reservations;
pub mod rooms;
