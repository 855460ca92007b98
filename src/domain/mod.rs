pub mod assignment;
pub mod directory;
pub mod error;
pub mod pack;
pub mod payment;
pub mod repositories;
pub mod reservation;
pub mod schedule;

// Re-export commonly used types
pub use assignment::{AssignmentPlan, AssignmentStatus, PackAssignment, WeeklySlot};
pub use directory::{Room, Sede, User, UserRole};
pub use error::{DomainError, DomainResult};
pub use pack::PackDefinition;
pub use payment::{BillingMonth, MonthlyPaymentDue, PaymentStatus};
pub use repositories::RepositoryProvider;
pub use reservation::{Reservation, ReservationStatus};
pub use schedule::{ScheduleConflict, TimeRange};
