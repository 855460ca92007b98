//! # PsicoEspacios scheduling service
//!
//! Recurring room packs for psychology clinics: weekly slot expansion,
//! all-or-nothing conflict detection, transactional reservation
//! materialization and a monthly payment ledger.
//!
//! ## Architecture
//!
//! - **domain**: entities, state machines, pure scheduling logic, repository traits
//! - **application**: use-case services and outbound ports
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **notifications**: in-process event bus behind the notification port
//! - **shared**: clock and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod server;
pub mod shared;

pub use config::{default_config_path, resolve_config_path, AppConfig, ConfigError};
pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
pub use interfaces::http::{create_api_router, AppState};
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
