//! Booking CRUD and cancellation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use booking_store::{Booking, BookingFilter, BookingStatus, BookingStore};
use chrono::{DateTime, Utc};
use common::{BookingId, FlightId, SeatNumber, UserId};
use orchestrator::{BookingCoordinator, FlightInventoryService};
use seat_lock::SeatLockManager;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<L, B, F>
where
    L: SeatLockManager,
    B: BookingStore,
    F: FlightInventoryService,
{
    pub coordinator: BookingCoordinator<L, B, F>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: i64,
    pub flight_id: i64,
    pub seat_number: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Option<i64>,
    pub flight_id: Option<i64>,
    pub status: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub user_id: i64,
    pub flight_id: i64,
    pub seat_number: i64,
    pub booking_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: f64,
    pub payment_id: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            user_id: booking.user_id.as_i64(),
            flight_id: booking.flight_id.as_i64(),
            seat_number: booking.seat_number.as_i64(),
            booking_date: booking.booking_date,
            status: booking.status.to_string(),
            total_amount: booking.total_amount,
            payment_id: booking.payment_id,
            cancelled_at: booking.cancelled_at,
            created_at: booking.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub booking_id: String,
    pub status: String,
}

// -- Handlers --

/// POST /bookings — run the booking creation saga.
#[tracing::instrument(skip(state, req))]
pub async fn create<L, B, F>(
    State(state): State<Arc<AppState<L, B, F>>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(axum::http::StatusCode, Json<BookingResponse>), ApiError>
where
    L: SeatLockManager + 'static,
    B: BookingStore + 'static,
    F: FlightInventoryService + 'static,
{
    let booking = state
        .coordinator
        .create_booking(
            UserId::new(req.user_id),
            FlightId::new(req.flight_id),
            SeatNumber::new(req.seat_number),
        )
        .await?;

    Ok((axum::http::StatusCode::CREATED, Json(booking.into())))
}

/// GET /bookings — list bookings with optional filters.
#[tracing::instrument(skip(state))]
pub async fn list<L, B, F>(
    State(state): State<Arc<AppState<L, B, F>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError>
where
    L: SeatLockManager + 'static,
    B: BookingStore + 'static,
    F: FlightInventoryService + 'static,
{
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => Some(
            BookingStatus::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid status: {raw}")))?,
        ),
    };

    let filter = BookingFilter {
        user_id: query.user_id.map(UserId::new),
        flight_id: query.flight_id.map(FlightId::new),
        status,
    };

    let bookings = state.coordinator.list_bookings(filter).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// GET /bookings/:id — load a booking by ID.
#[tracing::instrument(skip(state))]
pub async fn get<L, B, F>(
    State(state): State<Arc<AppState<L, B, F>>>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError>
where
    L: SeatLockManager + 'static,
    B: BookingStore + 'static,
    F: FlightInventoryService + 'static,
{
    let booking_id = parse_booking_id(&id)?;
    let booking = state.coordinator.get_booking(booking_id).await?;
    Ok(Json(booking.into()))
}

/// PUT /bookings/:id/cancel — cancel a booking.
#[tracing::instrument(skip(state))]
pub async fn cancel<L, B, F>(
    State(state): State<Arc<AppState<L, B, F>>>,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>, ApiError>
where
    L: SeatLockManager + 'static,
    B: BookingStore + 'static,
    F: FlightInventoryService + 'static,
{
    let booking_id = parse_booking_id(&id)?;
    state.coordinator.cancel_booking(booking_id).await?;
    Ok(Json(CancelResponse {
        message: "Booking cancelled successfully",
    }))
}

/// GET /bookings/:id/status — just the persisted status.
#[tracing::instrument(skip(state))]
pub async fn status<L, B, F>(
    State(state): State<Arc<AppState<L, B, F>>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError>
where
    L: SeatLockManager + 'static,
    B: BookingStore + 'static,
    F: FlightInventoryService + 'static,
{
    let booking_id = parse_booking_id(&id)?;
    let status = state.coordinator.booking_status(booking_id).await?;
    Ok(Json(StatusResponse {
        booking_id: booking_id.to_string(),
        status: status.to_string(),
    }))
}

fn parse_booking_id(raw: &str) -> Result<BookingId, ApiError> {
    let uuid = uuid::Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid booking id: {e}")))?;
    Ok(BookingId::from_uuid(uuid))
}
