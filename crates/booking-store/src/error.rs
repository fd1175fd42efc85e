//! Store error types.

use common::BookingId;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No booking exists with the given ID.
    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
