//! Booking orchestration error taxonomy.

use booking_store::{BookingStatus, StoreError};
use common::{BookingId, FlightId, SeatNumber};
use seat_lock::SeatLockError;
use thiserror::Error;

/// Errors that can occur during booking orchestration.
///
/// Synchronous-path errors (create, cancel, get) carry the originating
/// cause. Failures in the asynchronous path (payment and notification)
/// never surface through this type to the original caller; they are
/// recorded on the booking row or logged.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The inventory collaborator has no such flight.
    #[error("Flight not found: {0}")]
    FlightNotFound(FlightId),

    /// No booking exists with the given ID.
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// A collaborator is unreachable or answered outside its contract.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The flight has no seats left.
    #[error("No seats available on flight {0}")]
    InsufficientInventory(FlightId),

    /// The seat is already locked or booked by someone else.
    #[error("Seat {seat_number} on flight {flight_id} is already locked or booked")]
    SeatConflict {
        flight_id: FlightId,
        seat_number: SeatNumber,
    },

    /// The booking was already cancelled.
    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(BookingId),

    /// The booking's status admits no cancellation edge.
    #[error("Booking {id} cannot be cancelled from status {status}")]
    InvalidTransition { id: BookingId, status: BookingStatus },

    /// A store operation failed. Always compensated on the creation path.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// The lock store failed. Acquisition fails closed on this; it is
    /// distinct from [`BookingError::SeatConflict`].
    #[error("Seat lock store failure: {0}")]
    LockStore(#[from] SeatLockError),

    /// The payment collaborator declined or failed. Only ever produced by
    /// the background settlement task, which records it as status `failed`.
    #[error("Payment failed: {0}")]
    Payment(String),

    /// The notification collaborator refused the message. Logged and
    /// dropped by the dispatch task.
    #[error("Notification failed: {0}")]
    Notification(String),
}
