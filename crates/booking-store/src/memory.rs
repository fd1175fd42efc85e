//! In-memory booking store for testing.
//!
//! Stores rows in a `Vec` so listing yields insertion order, matching the
//! default behavior of the SQL implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use common::BookingId;
use tokio::sync::RwLock;

use crate::{Booking, BookingFilter, BookingStore, Result, StoreError};

/// In-memory implementation of [`BookingStore`].
#[derive(Clone, Default)]
pub struct InMemoryBookingStore {
    rows: Arc<RwLock<Vec<Booking>>>,
    fail_on_insert: Arc<AtomicBool>,
}

impl InMemoryBookingStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of persisted rows.
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Configures the store to fail inserts, for compensation tests.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.fail_on_insert.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        if self.fail_on_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.rows.write().await.push(booking.clone());
        Ok(())
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|b| b.id == id).cloned())
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or(StoreError::NotFound(booking.id))?;
        *row = booking.clone();
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: BookingId) -> Result<()> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|b| b.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|b| filter.matches(b)).cloned().collect())
    }
}
