//! The booking store trait and filtered queries.

use async_trait::async_trait;
use common::{BookingId, FlightId, UserId};

use crate::{Booking, BookingStatus, Result};

/// Optional, conjunctive filters for listing bookings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    pub user_id: Option<UserId>,
    pub flight_id: Option<FlightId>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    /// Returns true if `booking` matches every set filter.
    pub fn matches(&self, booking: &Booking) -> bool {
        self.user_id.is_none_or(|u| booking.user_id == u)
            && self.flight_id.is_none_or(|f| booking.flight_id == f)
            && self.status.is_none_or(|s| booking.status == s)
    }
}

/// CRUD over persisted bookings.
///
/// There is no uniqueness constraint beyond the primary key; in particular
/// two rows for the same (flight, seat) are representable, and preventing
/// them is the seat lock's job, not the store's.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persists a new booking row.
    async fn insert(&self, booking: &Booking) -> Result<()>;

    /// Loads a booking by ID.
    async fn get(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Overwrites an existing booking row, bumping `updated_at`.
    async fn update(&self, booking: &Booking) -> Result<()>;

    /// Hard-deletes a booking row. Exists only as a compensation for a
    /// failed creation attempt.
    async fn delete(&self, id: BookingId) -> Result<()>;

    /// Lists bookings matching `filter`, in the backend's default order.
    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>>;
}

#[async_trait]
impl<T: BookingStore + ?Sized> BookingStore for std::sync::Arc<T> {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        (**self).insert(booking).await
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>> {
        (**self).get(id).await
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        (**self).update(booking).await
    }

    async fn delete(&self, id: BookingId) -> Result<()> {
        (**self).delete(id).await
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>> {
        (**self).list(filter).await
    }
}
