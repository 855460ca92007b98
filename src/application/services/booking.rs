//! Standalone reservations and room availability

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::notify_detached;
use crate::application::ports::NotificationSender;
use crate::domain::reservation::{NewReservation, ReservationFilter};
use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationStatus, Room,
    TimeRange,
};
use crate::notifications::{Event, ReservationCreatedEvent};
use crate::shared::Clock;

#[derive(Debug, Clone)]
pub struct CreateReservationCommand {
    pub room_id: i32,
    pub professional_id: i32,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

/// A range of a room's day held by a live reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusySlot {
    pub range: TimeRange,
    pub reservation_id: i32,
    pub status: ReservationStatus,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            notifier,
            clock,
        }
    }

    /// Book a room once. Conflicts are checked inside the insert transaction.
    pub async fn create(&self, cmd: CreateReservationCommand) -> DomainResult<Reservation> {
        let range = TimeRange::parse(&cmd.start_time, &cmd.end_time)?;
        if cmd.date < self.clock.today() {
            return Err(DomainError::Validation(format!(
                "date {} is in the past",
                cmd.date
            )));
        }

        self.room(cmd.room_id).await?.ensure_bookable(None)?;
        self.repos
            .users()
            .find_by_id(cmd.professional_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", cmd.professional_id))?
            .ensure_active()?;

        let new = NewReservation::standalone(
            cmd.room_id,
            cmd.professional_id,
            cmd.date,
            range,
            cmd.notes,
        );
        let reservation = match self.repos.reservations().create_checked(new).await {
            Err(DomainError::ScheduleConflict(conflicts)) => {
                metrics::counter!("schedule_conflicts_detected_total")
                    .increment(conflicts.len() as u64);
                return Err(DomainError::ScheduleConflict(conflicts));
            }
            other => other?,
        };

        info!(
            reservation_id = reservation.id,
            room_id = reservation.room_id,
            date = %reservation.date,
            range = %reservation.range,
            "Reservation created"
        );

        notify_detached(
            &self.notifier,
            Event::ReservationCreated(ReservationCreatedEvent {
                reservation_id: reservation.id,
                room_id: reservation.room_id,
                professional_id: reservation.professional_id,
                date: reservation.date,
                start_time: reservation.range.start().format("%H:%M").to_string(),
                end_time: reservation.range.end().format("%H:%M").to_string(),
            }),
        );

        Ok(reservation)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }

    pub async fn list(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>> {
        if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
            if from > to {
                return Err(DomainError::validation("dateFrom must not be after dateTo"));
            }
        }
        self.repos.reservations().find(&filter).await
    }

    pub async fn change_status(
        &self,
        id: i32,
        status: ReservationStatus,
    ) -> DomainResult<Reservation> {
        let current = self.get(id).await?;
        let mut reservation = current.clone();
        reservation.transition_to(status, self.clock.now_utc())?;
        self.repos.reservations().update(&current, &reservation).await?;

        info!(
            reservation_id = id,
            from = %current.status,
            to = %status,
            "Reservation status changed"
        );
        Ok(reservation)
    }

    pub async fn list_rooms(&self, sede_id: Option<i32>) -> DomainResult<Vec<Room>> {
        self.repos.rooms().find_all(sede_id).await
    }

    /// Ranges of `date` already held in the room, ordered by start time.
    pub async fn availability(&self, room_id: i32, date: NaiveDate) -> DomainResult<Vec<BusySlot>> {
        self.room(room_id).await?;
        let filter = ReservationFilter {
            room_id: Some(room_id),
            date_from: Some(date),
            date_to: Some(date),
            ..Default::default()
        };
        let busy = self
            .repos
            .reservations()
            .find(&filter)
            .await?
            .into_iter()
            .filter(|r| r.status.blocks_room())
            .map(|r| BusySlot {
                range: r.range,
                reservation_id: r.id,
                status: r.status,
            })
            .collect();
        Ok(busy)
    }

    async fn room(&self, id: i32) -> DomainResult<Room> {
        self.repos
            .rooms()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Room", "id", id))
    }
}
