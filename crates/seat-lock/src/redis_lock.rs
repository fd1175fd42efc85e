//! Redis-backed seat lock.
//!
//! Uses `SET key holder NX EX ttl` for acquisition and `DEL key` for
//! release, so atomicity is delegated entirely to the store.

use std::time::Duration;

use async_trait::async_trait;
use common::UserId;
use redis::AsyncCommands;

use crate::{SeatLockError, SeatLockKey, SeatLockManager};

/// Networked implementation of [`SeatLockManager`] over a shared Redis.
#[derive(Clone)]
pub struct RedisSeatLock {
    client: redis::Client,
}

impl RedisSeatLock {
    /// Connects to the lock store at `connection_string`
    /// (e.g. `redis://localhost:6379/0`).
    pub fn new(connection_string: &str) -> Result<Self, SeatLockError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SeatLockManager for RedisSeatLock {
    async fn acquire(
        &self,
        key: &SeatLockKey,
        holder: UserId,
        ttl: Duration,
    ) -> Result<bool, SeatLockError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        // SET NX EX: set only if the key does not exist, with expiry.
        // Returns nil when a live lock is already present.
        let result: Option<String> = redis::cmd("SET")
            .arg(key.to_string())
            .arg(holder.as_i64())
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await?;

        let granted = result.is_some();
        if !granted {
            tracing::debug!(%key, %holder, "seat lock already held");
        }
        Ok(granted)
    }

    async fn release(&self, key: &SeatLockKey) -> Result<(), SeatLockError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // DEL on an absent key is a no-op, which gives release its
        // idempotence. Holder identity is deliberately not checked.
        let _: i64 = conn.del(key.to_string()).await?;
        Ok(())
    }
}
