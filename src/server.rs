//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, database and
//! migrations, services, the notification log, the REST API and graceful
//! shutdown. The binaries only parse arguments and hand over an [`AppConfig`].

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::{
    BookingService, NotificationSender, PackAssignmentService, PackCatalogService,
    PaymentLedgerService,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{init_database, run_migrations, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, AppState};
use crate::notifications::{create_event_bus, spawn_delivery_logger, EventBusNotifier};
use crate::shared::{Clock, ShutdownCoordinator, ShutdownSignal, SystemClock};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Apply pending migrations before serving (default: true)
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// Wire repositories, services and their collaborators into the HTTP state.
pub fn build_state(
    db: DatabaseConnection,
    config: &AppConfig,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
) -> AppState {
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    AppState {
        catalog: Arc::new(PackCatalogService::new(
            repos.clone(),
            config.billing.currency.clone(),
        )),
        assignments: Arc::new(PackAssignmentService::new(
            repos.clone(),
            notifier.clone(),
            clock.clone(),
            config.scheduling_window(),
        )),
        booking: Arc::new(BookingService::new(
            repos.clone(),
            notifier.clone(),
            clock.clone(),
        )),
        ledger: Arc::new(PaymentLedgerService::new(repos, notifier, clock)),
        db,
        started_at: Arc::new(Instant::now()),
    }
}

/// The recorder is process-global; a restart within one process reuses it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    if let Some(handle) = HANDLE.get() {
        return Some(handle.clone());
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder installed");
            Some(HANDLE.get_or_init(|| handle).clone())
        }
        Err(e) => {
            warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
            None
        }
    }
}

/// Handle to a running service.
pub struct ServerHandle {
    pub config: AppConfig,
    /// Address actually bound (port 0 resolves here)
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    logger_task: JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        info!("Starting PsicoEspacios scheduling service...");

        let prometheus = prometheus_handle();

        let db = init_database(&config.database_config()).await?;
        if opts.auto_migrate {
            info!("Running database migrations...");
            run_migrations(&db).await?;
        }

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let signal = shutdown.signal();

        let bus = create_event_bus();
        let logger_task = spawn_delivery_logger(bus.clone(), signal.clone());
        let notifier: Arc<dyn NotificationSender> = Arc::new(EventBusNotifier::new(bus));

        let state = build_state(db.clone(), &config, notifier, Arc::new(SystemClock));
        let router = create_api_router(state, prometheus);

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_signal = signal.clone();
        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_signal.wait().await;
                info!("REST API received shutdown signal");
            });
            if let Err(e) = server.await {
                error!(error = %e, "REST API server error");
            }
        });

        Ok(Self {
            config,
            local_addr,
            db,
            shutdown,
            api_task,
            logger_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGINT / SIGTERM.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for shutdown, drain in-flight requests within the configured
    /// timeout and close the pool.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            logger_task,
            ..
        } = self;

        let drained = shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!(error = %e, "REST API task panicked");
                }
                if let Err(e) = logger_task.await {
                    error!(error = %e, "Delivery logger task panicked");
                }
            })
            .await;
        if !drained {
            warn!("Some requests were still running at shutdown");
        }

        match db.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!(error = %e, "Error closing database connection"),
        }
        info!("PsicoEspacios shutdown complete");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}
