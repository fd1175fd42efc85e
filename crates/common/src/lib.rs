//! Shared identifier types used across the booking system.

mod types;

pub use types::{BookingId, FlightId, SeatNumber, UserId};
