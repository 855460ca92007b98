//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::assignment::AssignmentRepository;
use crate::domain::directory::{RoomRepository, UserRepository};
use crate::domain::pack::PackRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;

use super::assignment_repository::SeaOrmAssignmentRepository;
use super::directory_repository::{SeaOrmRoomRepository, SeaOrmUserRepository};
use super::pack_repository::SeaOrmPackRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::reservation_repository::SeaOrmReservationRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let pack = repos.packs().find_by_id(1).await?;
/// let conflicts = repos.reservations().scan_conflicts(&slots).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    packs: SeaOrmPackRepository,
    assignments: SeaOrmAssignmentRepository,
    reservations: SeaOrmReservationRepository,
    payments: SeaOrmPaymentRepository,
    rooms: SeaOrmRoomRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            packs: SeaOrmPackRepository::new(db.clone()),
            assignments: SeaOrmAssignmentRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            rooms: SeaOrmRoomRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn packs(&self) -> &dyn PackRepository {
        &self.packs
    }

    fn assignments(&self) -> &dyn AssignmentRepository {
        &self.assignments
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
