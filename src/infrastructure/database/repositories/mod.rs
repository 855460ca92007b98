//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

mod conflict_scan;
mod convert;

pub mod assignment_repository;
pub mod directory_repository;
pub mod pack_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod reservation_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
