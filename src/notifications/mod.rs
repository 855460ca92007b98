//! Notifications module
//!
//! In-process event bus used as the default notification channel.
//!
//! # Usage
//! ```ignore
//! use psicoespacios::notifications::{create_event_bus, EventBusNotifier};
//!
//! let bus = create_event_bus();
//! let notifier = EventBusNotifier::new(bus.clone());
//! let _logger = spawn_delivery_logger(bus, shutdown.signal());
//! ```

pub mod event_bus;
pub mod events;
pub mod notifier;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
pub use notifier::{spawn_delivery_logger, EventBusNotifier};
