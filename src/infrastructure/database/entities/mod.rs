//! Database entities module

pub mod assignment_slot;
pub mod monthly_payment;
pub mod pack;
pub mod pack_assignment;
pub mod reservation;
pub mod room;
pub mod sede;
pub mod user;

pub use assignment_slot::Entity as AssignmentSlot;
pub use monthly_payment::Entity as MonthlyPayment;
pub use pack::Entity as Pack;
pub use pack_assignment::Entity as PackAssignment;
pub use reservation::Entity as Reservation;
pub use room::Entity as Room;
pub use sede::Entity as Sede;
pub use user::Entity as User;
