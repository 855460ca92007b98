//! Pack assignment aggregate

pub mod model;
pub mod repository;

pub use model::{
    cancel_assignment, AssignmentPlan, AssignmentStatus, CancellationEffects, CancellationOutcome,
    MaterializedAssignment, PackAssignment, WeeklySlot,
};
pub use repository::AssignmentRepository;
