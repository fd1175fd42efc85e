//! The booking record and its status state machine.

use chrono::{DateTime, Utc};
use common::{BookingId, FlightId, SeatNumber, UserId};
use serde::{Deserialize, Serialize};

/// The status of a booking in its lifecycle.
///
/// Transitions:
/// ```text
/// Pending ──┬──► Confirmed ──► Cancelled
///           ├──► Failed
///           └──► Cancelled
/// ```
///
/// `Cancelled` and `Failed` are terminal; no edge leaves them. A booking is
/// created `Pending` by the coordinator, moved to `Confirmed`/`Failed` only
/// by the payment settlement task, and moved to `Cancelled` only by the
/// cancellation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Persisted, awaiting payment settlement.
    #[default]
    Pending,

    /// Payment settled (may still be cancelled).
    Confirmed,

    /// Cancelled by the user (terminal).
    Cancelled,

    /// Payment settlement failed (terminal).
    Failed,
}

impl BookingStatus {
    /// Returns true if `next` is a legal transition from this status.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Failed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    /// Returns true if the booking can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Failed)
    }

    /// Returns the wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Failed => "failed",
        }
    }

    /// Parses the wire form of the status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "failed" => Some(BookingStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted booking record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub flight_id: FlightId,
    pub seat_number: SeatNumber,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    /// Price snapshot taken at creation; never re-validated afterwards.
    pub total_amount: f64,
    pub payment_id: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new `Pending` booking with a fresh ID and timestamps.
    pub fn new(user_id: UserId, flight_id: FlightId, seat_number: SeatNumber, amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::new(),
            user_id,
            flight_id,
            seat_number,
            booking_date: now,
            status: BookingStatus::Pending,
            total_amount: amount,
            payment_id: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_pending() {
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
    }

    #[test]
    fn pending_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Failed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn confirmed_can_only_cancel() {
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Failed));
    }

    #[test]
    fn terminal_states_have_no_edges() {
        for next in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Failed,
        ] {
            assert!(!BookingStatus::Cancelled.can_transition_to(next));
            assert!(!BookingStatus::Failed.can_transition_to(next));
        }
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::from_str::<BookingStatus>("\"cancelled\"").unwrap(),
            BookingStatus::Cancelled
        );
    }

    #[test]
    fn parse_roundtrips_wire_form() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Failed,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("refunded"), None);
    }

    #[test]
    fn new_booking_is_pending_with_snapshot_price() {
        let booking = Booking::new(
            UserId::new(1),
            FlightId::new(2),
            SeatNumber::new(3),
            100.0,
        );
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_amount, 100.0);
        assert!(booking.payment_id.is_none());
        assert!(booking.cancelled_at.is_none());
    }
}
