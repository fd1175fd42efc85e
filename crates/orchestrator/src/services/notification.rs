//! Notification collaborator: trait, in-memory double, HTTP client.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use booking_store::BookingStatus;
use common::{BookingId, FlightId, UserId};
use serde::Serialize;

use crate::error::BookingError;

/// The message sent to the notification collaborator.
///
/// `status` is whatever is persisted when the dispatch task runs; if it
/// runs before payment settles the message reports `pending` even though
/// the booking may confirm moments later.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingNotification {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub flight_id: FlightId,
    pub status: BookingStatus,
    pub amount: f64,
}

/// Trait for the notification collaborator. Fire-and-forget from the
/// coordinator's perspective: delivery failure is logged and dropped.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Delivers one notification. Single attempt.
    async fn notify(&self, notification: &BookingNotification) -> Result<(), BookingError>;
}

#[derive(Debug, Default)]
struct InMemoryNotificationState {
    sent: Vec<BookingNotification>,
    fail_on_notify: bool,
}

/// In-memory notification collaborator for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationService {
    state: Arc<RwLock<InMemoryNotificationState>>,
}

impl InMemoryNotificationService {
    /// Creates a new in-memory notification service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the double to refuse deliveries.
    pub fn set_fail_on_notify(&self, fail: bool) {
        self.state.write().unwrap().fail_on_notify = fail;
    }

    /// Returns the number of delivered notifications.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Returns the most recently delivered notification.
    pub fn last_sent(&self) -> Option<BookingNotification> {
        self.state.read().unwrap().sent.last().cloned()
    }
}

#[async_trait]
impl NotificationService for InMemoryNotificationService {
    async fn notify(&self, notification: &BookingNotification) -> Result<(), BookingError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_notify {
            return Err(BookingError::Notification(
                "notification service refused delivery".to_string(),
            ));
        }
        state.sent.push(notification.clone());
        Ok(())
    }
}

/// HTTP client for the notification collaborator.
#[derive(Clone)]
pub struct HttpNotificationService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNotificationService {
    /// Creates a client against `base_url` (e.g. `http://localhost:8004`).
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl NotificationService for HttpNotificationService {
    async fn notify(&self, notification: &BookingNotification) -> Result<(), BookingError> {
        let url = format!("{}/notifications", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(notification)
            .send()
            .await
            .map_err(|e| BookingError::ServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BookingError::Notification(format!(
                "notification service returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
