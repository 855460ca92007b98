//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to all per-aggregate
//! repositories.

use super::assignment::AssignmentRepository;
use super::directory::{RoomRepository, UserRepository};
use super::pack::PackRepository;
use super::payment::PaymentRepository;
use super::reservation::ReservationRepository;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let pack = repos.packs().find_by_id(1).await?;
///     let dues = repos.payments().find(&PaymentFilter::default()).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn packs(&self) -> &dyn PackRepository;
    fn assignments(&self) -> &dyn AssignmentRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn rooms(&self) -> &dyn RoomRepository;
    fn users(&self) -> &dyn UserRepository;
}
