//! The booking saga coordinator.
//!
//! Sequences the creation path
//! `check inventory → lock seat → persist → decrement inventory → dispatch`
//! and the cancellation path, with explicit compensation instead of
//! transactional rollback: a failure after persistence deletes the row,
//! and every failure past lock acquisition releases the lock before the
//! call returns. A store failure during compensation itself can leave an
//! orphaned row with an already-released lock; there is no transactional
//! envelope across the booking store and the inventory collaborator, so
//! that gap is accepted rather than papered over.

use std::time::Duration;

use booking_store::{Booking, BookingFilter, BookingStatus, BookingStore};
use chrono::Utc;
use common::{BookingId, FlightId, SeatNumber, UserId};
use seat_lock::{DEFAULT_LOCK_TTL, SeatLockKey, SeatLockManager};

use crate::error::BookingError;
use crate::queue::{BookingTask, TaskQueue};
use crate::services::{FlightInfo, FlightInventoryService};

/// Orchestrates booking creation and cancellation across the seat lock,
/// the booking store, and the inventory collaborator.
pub struct BookingCoordinator<L, B, F>
where
    L: SeatLockManager,
    B: BookingStore,
    F: FlightInventoryService,
{
    locks: L,
    store: B,
    inventory: F,
    tasks: TaskQueue,
    lock_ttl: Duration,
}

impl<L, B, F> BookingCoordinator<L, B, F>
where
    L: SeatLockManager,
    B: BookingStore,
    F: FlightInventoryService,
{
    /// Creates a coordinator with the default seat lock lease.
    pub fn new(locks: L, store: B, inventory: F, tasks: TaskQueue) -> Self {
        Self {
            locks,
            store,
            inventory,
            tasks,
            lock_ttl: DEFAULT_LOCK_TTL,
        }
    }

    /// Overrides the seat lock lease duration.
    pub fn with_lock_ttl(mut self, ttl: Duration) -> Self {
        self.lock_ttl = ttl;
        self
    }

    /// Runs the booking creation saga.
    ///
    /// On success the returned booking is `Pending`; payment settlement and
    /// notification dispatch are enqueued and the caller never waits for
    /// them. `total_amount` is the price observed here, a point-in-time
    /// snapshot that later price changes do not retroactively affect.
    #[tracing::instrument(skip(self))]
    pub async fn create_booking(
        &self,
        user_id: UserId,
        flight_id: FlightId,
        seat_number: SeatNumber,
    ) -> Result<Booking, BookingError> {
        // 1. Availability and price from the inventory collaborator.
        let flight = self.inventory.get_flight(flight_id).await?;
        if flight.available_seats <= 0 {
            return Err(BookingError::InsufficientInventory(flight_id));
        }

        // 2. Seat admission. A store outage fails closed here rather than
        // risk double-admission.
        let key = SeatLockKey::new(flight_id, seat_number);
        if !self.locks.acquire(&key, user_id, self.lock_ttl).await? {
            metrics::counter!("booking_seat_conflicts_total").increment(1);
            return Err(BookingError::SeatConflict {
                flight_id,
                seat_number,
            });
        }

        // 3. Persist + decrement, compensating on failure. The lock is
        // released on every failure path past acquisition.
        match self.persist_and_decrement(user_id, flight_id, seat_number, flight).await {
            Ok(booking) => {
                self.tasks.enqueue(BookingTask::ProcessPayment(booking.id));
                self.tasks.enqueue(BookingTask::SendNotification(booking.id));

                metrics::counter!("bookings_created_total").increment(1);
                tracing::info!(booking_id = %booking.id, %user_id, %flight_id, %seat_number, "booking created");
                Ok(booking)
            }
            Err(err) => {
                metrics::counter!("booking_compensations_total").increment(1);
                if let Err(release_err) = self.locks.release(&key).await {
                    tracing::error!(%key, error = %release_err, "failed to release seat lock during compensation; lease TTL will reclaim it");
                }
                tracing::warn!(%flight_id, %seat_number, error = %err, "booking creation compensated");
                Err(err)
            }
        }
    }

    /// Steps 4–5 of the creation saga: persist the pending row, then
    /// decrement the collaborator's seat count. Deletes the row if the
    /// decrement fails; the caller releases the lock.
    async fn persist_and_decrement(
        &self,
        user_id: UserId,
        flight_id: FlightId,
        seat_number: SeatNumber,
        flight: FlightInfo,
    ) -> Result<Booking, BookingError> {
        let booking = Booking::new(user_id, flight_id, seat_number, flight.price);
        self.store.insert(&booking).await?;

        if let Err(err) = self
            .inventory
            .set_available_seats(flight_id, flight.available_seats - 1)
            .await
        {
            if let Err(delete_err) = self.store.delete(booking.id).await {
                tracing::error!(booking_id = %booking.id, error = %delete_err, "compensating delete failed; booking row orphaned");
            }
            return Err(err);
        }

        Ok(booking)
    }

    /// Cancels a booking.
    ///
    /// Sets the status to `Cancelled`, stamps the cancellation time,
    /// releases the seat lock, and hands the seat back to inventory. The
    /// re-increment is a read-modify-write against the collaborator, not
    /// an atomic update; concurrent cancellations on the same flight can
    /// lose updates. Cancellation never triggers an automatic refund.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_booking(&self, id: BookingId) -> Result<Booking, BookingError> {
        let mut booking = self
            .store
            .get(id)
            .await?
            .ok_or(BookingError::BookingNotFound(id))?;

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled(id));
        }
        if !booking.status.can_cancel() {
            return Err(BookingError::InvalidTransition {
                id,
                status: booking.status,
            });
        }

        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(Utc::now());
        self.store.update(&booking).await?;

        // The cancellation is committed; a lock-store failure here is
        // logged and left to the lease TTL.
        let key = SeatLockKey::new(booking.flight_id, booking.seat_number);
        if let Err(release_err) = self.locks.release(&key).await {
            tracing::error!(%key, error = %release_err, "failed to release seat lock on cancellation");
        }

        // Hand the seat back: read current availability, write value + 1.
        let flight = self.inventory.get_flight(booking.flight_id).await?;
        self.inventory
            .set_available_seats(booking.flight_id, flight.available_seats + 1)
            .await?;

        metrics::counter!("bookings_cancelled_total").increment(1);
        tracing::info!(booking_id = %id, "booking cancelled");
        Ok(booking)
    }

    /// Loads a booking by ID.
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking, BookingError> {
        self.store
            .get(id)
            .await?
            .ok_or(BookingError::BookingNotFound(id))
    }

    /// Lists bookings matching `filter`, in store order.
    pub async fn list_bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>, BookingError> {
        Ok(self.store.list(filter).await?)
    }

    /// Returns just the persisted status of a booking.
    pub async fn booking_status(&self, id: BookingId) -> Result<BookingStatus, BookingError> {
        Ok(self.get_booking(id).await?.status)
    }
}
