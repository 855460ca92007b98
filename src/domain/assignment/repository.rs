//! Pack assignment repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

use super::model::{
    AssignmentPlan, AssignmentStatus, CancellationOutcome, MaterializedAssignment, PackAssignment,
    WeeklySlot,
};
use crate::domain::DomainResult;

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Persist an assignment with its slots, reservations and monthly dues
    /// in one transaction.
    ///
    /// Conflicts are scanned again inside the transaction; any conflict
    /// aborts with `DomainError::ScheduleConflict` and nothing is written.
    async fn materialize(&self, plan: &AssignmentPlan) -> DomainResult<MaterializedAssignment>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PackAssignment>>;

    async fn find_slots(&self, assignment_id: i32) -> DomainResult<Vec<WeeklySlot>>;

    /// Newest first
    async fn find_all(
        &self,
        user_id: Option<i32>,
        status: Option<AssignmentStatus>,
    ) -> DomainResult<Vec<PackAssignment>>;

    /// Cancel the assignment and release its future reservations and empty
    /// months in one transaction. `now` is the local wall-clock time used to
    /// decide which reservations are still ahead.
    async fn cancel(
        &self,
        id: i32,
        now: NaiveDateTime,
        at: DateTime<Utc>,
    ) -> DomainResult<CancellationOutcome>;
}
