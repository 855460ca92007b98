//! Reservation repository interface

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, ReservationFilter};
use crate::domain::schedule::{ExpandedSlot, ScheduleConflict};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// List reservations ordered by date and start time
    async fn find(&self, filter: &ReservationFilter) -> DomainResult<Vec<Reservation>>;

    /// Conflicts between `slots` and existing non-cancelled reservations.
    ///
    /// Read only; calling it twice on unchanged data gives the same result.
    async fn scan_conflicts(&self, slots: &[ExpandedSlot]) -> DomainResult<Vec<ScheduleConflict>>;

    /// Insert a standalone booking after re-checking conflicts in the same
    /// transaction. Fails with `DomainError::ScheduleConflict` when taken.
    async fn create_checked(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Persist the transition `current` -> `updated`.
    ///
    /// Written only while the stored row still has `current.status`, and
    /// payment status only when the transition changed it (and the stored
    /// one still matches). Otherwise `DomainError::InvalidTransition`.
    async fn update(&self, current: &Reservation, updated: &Reservation) -> DomainResult<()>;
}
