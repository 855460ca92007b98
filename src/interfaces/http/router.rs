//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    BookingService, PackAssignmentService, PackCatalogService, PaymentLedgerService,
};
use crate::interfaces::http::common::{ApiResponse, ConflictDto, ConflictReport};

use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{assignments, health, packs, payments, reservations, rooms};

/// Everything the handlers need; each module extracts its own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<PackCatalogService>,
    pub assignments: Arc<PackAssignmentService>,
    pub booking: Arc<BookingService>,
    pub ledger: Arc<PaymentLedgerService>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for packs::PackState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            catalog: Arc::clone(&s.catalog),
            assignments: Arc::clone(&s.assignments),
        }
    }
}

impl FromRef<AppState> for assignments::AssignmentState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            assignments: Arc::clone(&s.assignments),
        }
    }
}

impl FromRef<AppState> for reservations::ReservationState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            booking: Arc::clone(&s.booking),
        }
    }
}

impl FromRef<AppState> for rooms::RoomState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            booking: Arc::clone(&s.booking),
        }
    }
}

impl FromRef<AppState> for payments::PaymentState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            ledger: Arc::clone(&s.ledger),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Packs
        packs::list_packs,
        packs::get_pack,
        packs::create_pack,
        packs::update_pack,
        packs::deactivate_pack,
        packs::assign_pack,
        packs::check_assignment,
        // Assignments
        assignments::list_assignments,
        assignments::get_assignment,
        assignments::cancel_assignment,
        assignments::assignment_reservations,
        assignments::assignment_payments,
        // Reservations
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::update_reservation_status,
        // Payments
        payments::list_payments,
        payments::get_payment,
        payments::mark_paid,
        payments::refund_payment,
        payments::cancel_payment,
        // Rooms
        rooms::list_rooms,
        rooms::room_availability,
    ),
    components(
        schemas(
            ApiResponse<String>,
            ConflictReport,
            ConflictDto,
            health::HealthResponse,
            packs::PackDto,
            packs::CreatePackRequest,
            packs::UpdatePackRequest,
            packs::WeeklySlotRequest,
            packs::AssignPackRequest,
            packs::AssignPackResponse,
            packs::ConflictCheckResponse,
            assignments::AssignmentDto,
            assignments::WeeklySlotDto,
            assignments::CancelAssignmentResponse,
            reservations::ReservationDto,
            reservations::CreateReservationRequest,
            reservations::UpdateReservationStatusRequest,
            payments::PaymentDto,
            payments::MarkPaidResponse,
            payments::RefundRequest,
            rooms::RoomDto,
            rooms::BusySlotDto,
            rooms::AvailabilityResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Packs", description = "Pack catalog and recurring pack assignment"),
        (name = "Assignments", description = "Pack assignments, their reservations and dues"),
        (name = "Reservations", description = "Room bookings and their lifecycle"),
        (name = "Payments", description = "Monthly payment ledger"),
        (name = "Rooms", description = "Rooms (boxes) and daily availability"),
    ),
    info(
        title = "PsicoEspacios Scheduling API",
        version = "1.0.0",
        description = "Recurring room packs, conflict detection and monthly billing for psychology clinics"
    )
)]
pub struct ApiDoc;

/// Build the full HTTP surface.
///
/// `/metrics` is mounted only when a Prometheus handle is given.
pub fn create_api_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    let pack_routes = Router::new()
        .route("/", get(packs::list_packs).post(packs::create_pack))
        .route("/assign", post(packs::assign_pack))
        .route("/assign/check", post(packs::check_assignment))
        .route(
            "/{id}",
            get(packs::get_pack)
                .put(packs::update_pack)
                .delete(packs::deactivate_pack),
        );

    let assignment_routes = Router::new()
        .route("/", get(assignments::list_assignments))
        .route("/{id}", get(assignments::get_assignment))
        .route("/{id}/cancel", post(assignments::cancel_assignment))
        .route(
            "/{id}/reservations",
            get(assignments::assignment_reservations),
        )
        .route("/{id}/payments", get(assignments::assignment_payments));

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/{id}", get(reservations::get_reservation))
        .route(
            "/{id}/status",
            patch(reservations::update_reservation_status),
        );

    let payment_routes = Router::new()
        .route("/", get(payments::list_payments))
        .route("/{id}", get(payments::get_payment))
        .route("/{id}/mark-paid", post(payments::mark_paid))
        .route("/{id}/refund", post(payments::refund_payment))
        .route("/{id}/cancel", post(payments::cancel_payment));

    let room_routes = Router::new()
        .route("/", get(rooms::list_rooms))
        .route("/{id}/availability", get(rooms::room_availability));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/packs", pack_routes)
        .nest("/api/v1/assignments", assignment_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/payments", payment_routes)
        .nest("/api/v1/rooms", room_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
