//! PostgreSQL-backed booking store.

use async_trait::async_trait;
use chrono::Utc;
use common::{BookingId, FlightId, SeatNumber, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{Booking, BookingFilter, BookingStatus, BookingStore, Result, StoreError};

/// PostgreSQL implementation of [`BookingStore`].
///
/// Each clone shares the pool but checks out its own connection per call,
/// so the background tasks get their own sessions.
#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Creates a new PostgreSQL booking store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_booking(row: PgRow) -> Result<Booking> {
        let status_str: String = row.try_get("status")?;
        let status = BookingStatus::parse(&status_str).ok_or_else(|| {
            StoreError::Database(sqlx::Error::Decode(
                format!("unknown booking status {status_str:?}").into(),
            ))
        })?;

        Ok(Booking {
            id: BookingId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            flight_id: FlightId::new(row.try_get("flight_id")?),
            seat_number: SeatNumber::new(row.try_get("seat_number")?),
            booking_date: row.try_get("booking_date")?,
            status,
            total_amount: row.try_get("total_amount")?,
            payment_id: row.try_get("payment_id")?,
            cancelled_at: row.try_get("cancelled_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, flight_id, seat_number, booking_date, status, \
     total_amount, payment_id, cancelled_at, created_at, updated_at";

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            "INSERT INTO bookings (id, user_id, flight_id, seat_number, booking_date, status, \
             total_amount, payment_id, cancelled_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.user_id.as_i64())
        .bind(booking.flight_id.as_i64())
        .bind(booking.seat_number.as_i64())
        .bind(booking.booking_date)
        .bind(booking.status.as_str())
        .bind(booking.total_amount)
        .bind(&booking.payment_id)
        .bind(booking.cancelled_at)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        let result = sqlx::query(
            "UPDATE bookings SET status = $1, total_amount = $2, payment_id = $3, \
             cancelled_at = $4, updated_at = $5 WHERE id = $6",
        )
        .bind(booking.status.as_str())
        .bind(booking.total_amount)
        .bind(&booking.payment_id)
        .bind(booking.cancelled_at)
        .bind(Utc::now())
        .bind(booking.id.as_uuid())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(booking.id));
        }
        Ok(())
    }

    async fn delete(&self, id: BookingId) -> Result<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>> {
        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM bookings WHERE 1=1");
        let mut param_count = 0;

        // Build dynamic query
        if filter.user_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND user_id = ${param_count}"));
        }
        if filter.flight_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND flight_id = ${param_count}"));
        }
        if filter.status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }

        sql.push_str(" ORDER BY created_at");

        let mut query = sqlx::query(&sql);
        if let Some(user_id) = filter.user_id {
            query = query.bind(user_id.as_i64());
        }
        if let Some(flight_id) = filter.flight_id {
            query = query.bind(flight_id.as_i64());
        }
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_booking).collect()
    }
}
