//! Keyed, time-bounded mutual exclusion over (flight, seat) pairs.
//!
//! The lock store is the sole authority for seat admission: the booking
//! table carries no uniqueness constraint on (flight, seat), so exclusivity
//! rests entirely on the atomic set-if-absent-with-expiry semantics provided
//! here. Expiry is the only automatic reclamation mechanism; it bounds the
//! cost of a crashed or abandoned holder.

pub mod error;
pub mod key;
pub mod memory;
pub mod redis_lock;

pub use error::SeatLockError;
pub use key::SeatLockKey;
pub use memory::InMemorySeatLock;
pub use redis_lock::RedisSeatLock;

use std::time::Duration;

use async_trait::async_trait;
use common::UserId;

/// Default lease duration for a seat lock.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(300);

/// Capability trait for the keyed seat lock store.
///
/// An in-memory timer-based implementation and a networked implementation
/// are interchangeable behind this trait; the coordinator never depends on
/// the backend.
#[async_trait]
pub trait SeatLockManager: Send + Sync {
    /// Atomically acquires the lock for `key` on behalf of `holder`.
    ///
    /// Returns `Ok(false)` when a non-expired lock already exists under a
    /// different value. Never blocks or queues: callers must treat `false`
    /// as immediate rejection, not retry until success.
    ///
    /// If the lock store is unreachable this fails closed with
    /// [`SeatLockError::Unavailable`]; a store outage is a distinct
    /// failure, never conflated with "lock held".
    async fn acquire(
        &self,
        key: &SeatLockKey,
        holder: UserId,
        ttl: Duration,
    ) -> Result<bool, SeatLockError>;

    /// Releases the lock for `key`.
    ///
    /// Idempotent: succeeds whether or not a lock exists. Does not verify
    /// that the caller is the original holder; any caller able to name the
    /// key can clear it.
    async fn release(&self, key: &SeatLockKey) -> Result<(), SeatLockError>;
}

#[async_trait]
impl<T: SeatLockManager + ?Sized> SeatLockManager for std::sync::Arc<T> {
    async fn acquire(
        &self,
        key: &SeatLockKey,
        holder: UserId,
        ttl: Duration,
    ) -> Result<bool, SeatLockError> {
        (**self).acquire(key, holder, ttl).await
    }

    async fn release(&self, key: &SeatLockKey) -> Result<(), SeatLockError> {
        (**self).release(key).await
    }
}
