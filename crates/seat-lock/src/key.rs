//! Seat lock keys.

use common::{FlightId, SeatNumber};

/// The lock key for one physical seat on one flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatLockKey {
    pub flight_id: FlightId,
    pub seat_number: SeatNumber,
}

impl SeatLockKey {
    pub fn new(flight_id: FlightId, seat_number: SeatNumber) -> Self {
        Self {
            flight_id,
            seat_number,
        }
    }
}

// Rendered form doubles as the Redis key.
impl std::fmt::Display for SeatLockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seat_lock:{}:{}", self.flight_id, self.seat_number)
    }
}
