//! Persisted booking records and filtered queries.
//!
//! The store is deliberately free of any uniqueness constraint on
//! (flight, seat); seat exclusivity is an application-level responsibility
//! resting entirely on the seat lock. Listing order is whatever the backend
//! yields (insertion order for the in-memory store) and is not contractual.

pub mod booking;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use booking::{Booking, BookingStatus};
pub use error::StoreError;
pub use memory::InMemoryBookingStore;
pub use postgres::PostgresBookingStore;
pub use store::{BookingFilter, BookingStore};

/// Convenience result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
