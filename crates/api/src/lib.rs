//! HTTP API surface for the booking system.
//!
//! Thin, non-core layer over the orchestrator: create, list-with-filters,
//! get-by-id, cancel, and get-status, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use booking_store::{BookingStore, InMemoryBookingStore};
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::{
    BookingCoordinator, FlightInventoryService, InMemoryFlightInventory,
    InMemoryNotificationService, InMemoryPaymentService, TaskQueue, TaskRunner,
};
use seat_lock::{InMemorySeatLock, SeatLockManager};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
use routes::bookings::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<L, B, F>(state: Arc<AppState<L, B, F>>, metrics_handle: PrometheusHandle) -> Router
where
    L: SeatLockManager + 'static,
    B: BookingStore + 'static,
    F: FlightInventoryService + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/bookings", post(routes::bookings::create::<L, B, F>))
        .route("/bookings", get(routes::bookings::list::<L, B, F>))
        .route("/bookings/{id}", get(routes::bookings::get::<L, B, F>))
        .route(
            "/bookings/{id}/cancel",
            put(routes::bookings::cancel::<L, B, F>),
        )
        .route(
            "/bookings/{id}/status",
            get(routes::bookings::status::<L, B, F>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// In-memory collaborators and stores wired together, for tests and local
/// runs without external services. Returns the state, the inventory double
/// (so callers can seed flights), and the runner's join handle.
pub fn create_default_state() -> (
    Arc<AppState<InMemorySeatLock, InMemoryBookingStore, InMemoryFlightInventory>>,
    InMemoryFlightInventory,
    tokio::task::JoinHandle<()>,
) {
    let locks = InMemorySeatLock::new();
    let store = InMemoryBookingStore::new();
    let inventory = InMemoryFlightInventory::new();

    let (tasks, task_rx) = TaskQueue::new();
    let runner = TaskRunner::new(
        store.clone(),
        InMemoryPaymentService::new(),
        InMemoryNotificationService::new(),
    );
    let runner_handle = runner.spawn(task_rx);

    let coordinator = BookingCoordinator::new(locks, store, inventory.clone(), tasks);
    let state = Arc::new(AppState { coordinator });

    (state, inventory, runner_handle)
}
