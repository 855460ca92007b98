//! Shared fixtures: a migrated in-memory database with one sede, two rooms,
//! two psychologists and a monthly pack.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;

use psicoespacios::application::services::{AssignPackCommand, WeeklySlotInput};
use psicoespacios::application::{
    BookingService, NotificationError, NotificationSender, PackAssignmentService,
    PaymentLedgerService,
};
use psicoespacios::config::AppConfig;
use psicoespacios::domain::reservation::NewReservation;
use psicoespacios::domain::{
    PackDefinition, RepositoryProvider, Reservation, ReservationStatus, Room, Sede, TimeRange,
    User, UserRole,
};
use psicoespacios::domain::PaymentStatus;
use psicoespacios::notifications::Event;
use psicoespacios::server::build_state;
use psicoespacios::shared::{Clock, FixedClock};
use psicoespacios::{
    init_database, run_migrations, AppState, DatabaseConfig, SeaOrmRepositoryProvider,
};

/// Notification sender that keeps every event for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<Event>>,
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, event: Event) -> Result<(), NotificationError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

pub struct Fixture {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub notifier: Arc<RecordingNotifier>,
    pub sede: Sede,
    pub room1: Room,
    pub room2: Room,
    pub ana: User,
    pub bruno: User,
    pub pack: PackDefinition,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// The day before the September 2025 scenarios start.
pub fn default_now() -> NaiveDateTime {
    at(2025, 8, 31, 8, 0)
}

pub fn slot(weekday: u8, start: &str, end: &str, room_id: i32) -> WeeklySlotInput {
    WeeklySlotInput {
        weekday,
        start_time: start.to_string(),
        end_time: end.to_string(),
        room_id,
    }
}

impl Fixture {
    pub async fn new() -> Self {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&db).await.unwrap();
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        let sede = repos
            .rooms()
            .save_sede(Sede {
                id: 0,
                name: "Providencia".into(),
                address: Some("Av. Providencia 1234".into()),
                is_active: true,
            })
            .await
            .unwrap();
        let room1 = repos
            .rooms()
            .save_room(Room {
                id: 0,
                sede_id: sede.id,
                name: "Box 1".into(),
                is_active: true,
            })
            .await
            .unwrap();
        let room2 = repos
            .rooms()
            .save_room(Room {
                id: 0,
                sede_id: sede.id,
                name: "Box 2".into(),
                is_active: true,
            })
            .await
            .unwrap();

        let ana = repos.users().save(user("Ana Rojas", "ana@example.com")).await.unwrap();
        let bruno = repos
            .users()
            .save(user("Bruno Díaz", "bruno@example.com"))
            .await
            .unwrap();

        let pack = repos
            .packs()
            .save(PackDefinition::new("Pack mensual", None, 16, 100_000, "CLP"))
            .await
            .unwrap();

        Self {
            db,
            repos,
            notifier: Arc::new(RecordingNotifier::default()),
            sede,
            room1,
            room2,
            ana,
            bruno,
            pack,
        }
    }

    pub fn clock(&self, now: NaiveDateTime) -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(now))
    }

    pub fn assignments_at(&self, now: NaiveDateTime) -> PackAssignmentService {
        PackAssignmentService::new(
            self.repos.clone(),
            self.notifier.clone(),
            self.clock(now),
            AppConfig::default().scheduling_window(),
        )
    }

    pub fn assignments(&self) -> PackAssignmentService {
        self.assignments_at(default_now())
    }

    pub fn ledger(&self) -> PaymentLedgerService {
        PaymentLedgerService::new(
            self.repos.clone(),
            self.notifier.clone(),
            self.clock(default_now()),
        )
    }

    pub fn booking(&self) -> BookingService {
        BookingService::new(self.repos.clone(), self.notifier.clone(), self.clock(default_now()))
    }

    pub fn app_state(&self) -> AppState {
        build_state(
            self.db.clone(),
            &AppConfig::default(),
            self.notifier.clone(),
            self.clock(default_now()),
        )
    }

    /// Ana, Mondays 09:00-10:00 in Box 1, September 2025.
    pub fn monday_command(&self) -> AssignPackCommand {
        AssignPackCommand {
            pack_id: self.pack.id,
            user_id: self.ana.id,
            recurring: true,
            start_date: Some(date(2025, 9, 1)),
            deadline: Some(date(2025, 9, 30)),
            sede_id: Some(self.sede.id),
            weekly_slots: vec![slot(1, "09:00", "10:00", self.room1.id)],
        }
    }

    /// Insert a confirmed standalone booking directly.
    pub async fn book(
        &self,
        room: &Room,
        professional: &User,
        day: NaiveDate,
        start: &str,
        end: &str,
    ) -> Reservation {
        let mut new = NewReservation::standalone(
            room.id,
            professional.id,
            day,
            TimeRange::parse(start, end).unwrap(),
            None,
        );
        new.status = ReservationStatus::Confirmed;
        new.payment_status = PaymentStatus::PendingPayment;
        self.repos.reservations().create_checked(new).await.unwrap()
    }

    pub async fn all_reservations(&self) -> Vec<Reservation> {
        self.repos
            .reservations()
            .find(&Default::default())
            .await
            .unwrap()
    }
}

fn user(name: &str, email: &str) -> User {
    User {
        id: 0,
        name: name.into(),
        email: email.into(),
        role: UserRole::Psychologist,
        is_active: true,
        created_at: Utc::now(),
    }
}

/// Let detached notification tasks run.
pub async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}
