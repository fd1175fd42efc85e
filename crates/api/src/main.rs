//! Booking API server entry point.

use std::sync::Arc;

use api::Config;
use api::routes::bookings::AppState;
use booking_store::{BookingStore, InMemoryBookingStore, PostgresBookingStore};
use orchestrator::{
    BookingCoordinator, HttpFlightInventory, HttpNotificationService, HttpPaymentService,
    TaskQueue, TaskRunner,
};
use seat_lock::{InMemorySeatLock, RedisSeatLock, SeatLockManager};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    let config = Config::from_env();

    // 3. Seat lock store: Redis when configured, in-process otherwise
    let locks: Arc<dyn SeatLockManager> = match &config.redis_url {
        Some(url) => {
            tracing::info!(%url, "using Redis seat lock store");
            Arc::new(RedisSeatLock::new(url).expect("failed to create Redis seat lock"))
        }
        None => {
            tracing::warn!("REDIS_URL not set; seat locks are process-local");
            Arc::new(InMemorySeatLock::new())
        }
    };

    // 4. Booking store: Postgres when configured, in-memory otherwise
    let store: Arc<dyn BookingStore> = match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .expect("failed to connect to database");
            let store = PostgresBookingStore::new(pool);
            store.run_migrations().await.expect("migrations failed");
            tracing::info!("using Postgres booking store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; bookings are not durable");
            Arc::new(InMemoryBookingStore::new())
        }
    };

    // 5. Collaborator HTTP clients with explicit endpoints from config
    let client = reqwest::Client::new();
    let inventory = HttpFlightInventory::new(client.clone(), config.flight_service_url.clone());
    let payment = HttpPaymentService::new(client.clone(), config.payment_service_url.clone());
    let notification =
        HttpNotificationService::new(client, config.notification_service_url.clone());

    // 6. Post-commit pipeline and coordinator
    let (tasks, task_rx) = TaskQueue::new();
    let runner = TaskRunner::new(store.clone(), payment, notification);
    let runner_handle = runner.spawn(task_rx);

    let coordinator = BookingCoordinator::new(locks, store, inventory, tasks);
    let state = Arc::new(AppState { coordinator });

    // 7. Build and start the server
    let app = api::create_app(state, metrics_handle);
    let addr = config.addr();
    tracing::info!(%addr, "starting booking API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // Queued tasks still in flight are dropped here, matching the
    // at-most-once contract of the post-commit pipeline.
    runner_handle.abort();
    tracing::info!("server shut down gracefully");
}
