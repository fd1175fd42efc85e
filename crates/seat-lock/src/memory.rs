//! In-memory seat lock for testing and single-node deployments.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::UserId;

use crate::{SeatLockError, SeatLockKey, SeatLockManager};

#[derive(Debug)]
struct LockEntry {
    holder: UserId,
    deadline: Instant,
}

#[derive(Debug, Default)]
struct InMemoryLockState {
    locks: HashMap<String, LockEntry>,
    unavailable: bool,
}

/// Timer-based in-memory implementation of [`SeatLockManager`].
///
/// Expired entries are treated as absent and may be overwritten by the next
/// acquirer; nothing sweeps them eagerly, matching the lease semantics of
/// the networked store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySeatLock {
    state: Arc<RwLock<InMemoryLockState>>,
}

impl InMemorySeatLock {
    /// Creates a new empty lock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a store outage: every call fails until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Returns the current holder of `key`, if the lock is still live.
    pub fn holder(&self, key: &SeatLockKey) -> Option<UserId> {
        let state = self.state.read().unwrap();
        state
            .locks
            .get(&key.to_string())
            .filter(|e| e.deadline > Instant::now())
            .map(|e| e.holder)
    }

    /// Returns the number of non-expired locks.
    pub fn live_lock_count(&self) -> usize {
        let now = Instant::now();
        let state = self.state.read().unwrap();
        state.locks.values().filter(|e| e.deadline > now).count()
    }
}

#[async_trait]
impl SeatLockManager for InMemorySeatLock {
    async fn acquire(
        &self,
        key: &SeatLockKey,
        holder: UserId,
        ttl: Duration,
    ) -> Result<bool, SeatLockError> {
        let mut state = self.state.write().unwrap();
        if state.unavailable {
            return Err(SeatLockError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }

        let now = Instant::now();
        let slot = state.locks.entry(key.to_string());
        match slot {
            std::collections::hash_map::Entry::Occupied(mut occupied) => {
                if occupied.get().deadline > now {
                    return Ok(false);
                }
                occupied.insert(LockEntry {
                    holder,
                    deadline: now + ttl,
                });
                Ok(true)
            }
            std::collections::hash_map::Entry::Vacant(vacant) => {
                vacant.insert(LockEntry {
                    holder,
                    deadline: now + ttl,
                });
                Ok(true)
            }
        }
    }

    async fn release(&self, key: &SeatLockKey) -> Result<(), SeatLockError> {
        let mut state = self.state.write().unwrap();
        if state.unavailable {
            return Err(SeatLockError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        state.locks.remove(&key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{FlightId, SeatNumber};

    fn key(flight: i64, seat: i64) -> SeatLockKey {
        SeatLockKey::new(FlightId::new(flight), SeatNumber::new(seat))
    }

    #[tokio::test]
    async fn acquire_grants_free_seat() {
        let locks = InMemorySeatLock::new();
        let acquired = locks
            .acquire(&key(1, 1), UserId::new(10), Duration::from_secs(300))
            .await
            .unwrap();
        assert!(acquired);
        assert_eq!(locks.holder(&key(1, 1)), Some(UserId::new(10)));
    }

    #[tokio::test]
    async fn second_acquire_is_rejected_without_blocking() {
        let locks = InMemorySeatLock::new();
        assert!(
            locks
                .acquire(&key(1, 1), UserId::new(10), Duration::from_secs(300))
                .await
                .unwrap()
        );
        assert!(
            !locks
                .acquire(&key(1, 1), UserId::new(20), Duration::from_secs(300))
                .await
                .unwrap()
        );
        // Original holder is untouched.
        assert_eq!(locks.holder(&key(1, 1)), Some(UserId::new(10)));
    }

    #[tokio::test]
    async fn locks_on_distinct_seats_are_independent() {
        let locks = InMemorySeatLock::new();
        assert!(
            locks
                .acquire(&key(1, 1), UserId::new(10), Duration::from_secs(300))
                .await
                .unwrap()
        );
        assert!(
            locks
                .acquire(&key(1, 2), UserId::new(20), Duration::from_secs(300))
                .await
                .unwrap()
        );
        assert_eq!(locks.live_lock_count(), 2);
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let locks = InMemorySeatLock::new();
        // Releasing a lock that was never acquired is a no-op success.
        locks.release(&key(1, 1)).await.unwrap();

        assert!(
            locks
                .acquire(&key(1, 1), UserId::new(10), Duration::from_secs(300))
                .await
                .unwrap()
        );
        locks.release(&key(1, 1)).await.unwrap();
        locks.release(&key(1, 1)).await.unwrap();
        assert_eq!(locks.holder(&key(1, 1)), None);
    }

    #[tokio::test]
    async fn release_does_not_check_holder() {
        let locks = InMemorySeatLock::new();
        assert!(
            locks
                .acquire(&key(1, 1), UserId::new(10), Duration::from_secs(300))
                .await
                .unwrap()
        );
        // Any caller naming the key can clear it.
        locks.release(&key(1, 1)).await.unwrap();
        assert!(
            locks
                .acquire(&key(1, 1), UserId::new(20), Duration::from_secs(300))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn expired_lock_is_reacquirable_by_another_holder() {
        let locks = InMemorySeatLock::new();
        assert!(
            locks
                .acquire(&key(1, 1), UserId::new(10), Duration::from_millis(20))
                .await
                .unwrap()
        );
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(
            locks
                .acquire(&key(1, 1), UserId::new(20), Duration::from_secs(300))
                .await
                .unwrap()
        );
        assert_eq!(locks.holder(&key(1, 1)), Some(UserId::new(20)));
    }

    #[tokio::test]
    async fn acquire_fails_closed_when_store_is_down() {
        let locks = InMemorySeatLock::new();
        locks.set_unavailable(true);
        let result = locks
            .acquire(&key(1, 1), UserId::new(10), Duration::from_secs(300))
            .await;
        assert!(matches!(result, Err(SeatLockError::Unavailable(_))));
    }

    #[tokio::test]
    async fn concurrent_acquires_admit_exactly_one() {
        let locks = InMemorySeatLock::new();
        let mut handles = Vec::new();
        for user in 0..16 {
            let locks = locks.clone();
            handles.push(tokio::spawn(async move {
                locks
                    .acquire(&key(9, 9), UserId::new(user), Duration::from_secs(300))
                    .await
                    .unwrap()
            }));
        }

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                granted += 1;
            }
        }
        assert_eq!(granted, 1);
        assert_eq!(locks.live_lock_count(), 1);
    }
}
