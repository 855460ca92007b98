//! Application layer
//!
//! Use-case services and the outbound ports they depend on.

pub mod ports;
pub mod services;

pub use ports::{NotificationError, NotificationSender};
pub use services::{
    BookingService, PackAssignmentService, PackCatalogService, PaymentLedgerService,
};
