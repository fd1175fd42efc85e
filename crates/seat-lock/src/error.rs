//! Seat lock error types.

use thiserror::Error;

/// Errors that can occur against the lock store.
#[derive(Debug, Error)]
pub enum SeatLockError {
    /// The lock store is unreachable. Acquisition fails closed on this.
    #[error("Lock store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for SeatLockError {
    fn from(err: redis::RedisError) -> Self {
        SeatLockError::Unavailable(err.to_string())
    }
}
