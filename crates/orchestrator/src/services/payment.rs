//! Payment collaborator: trait, in-memory double, HTTP client.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{BookingId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Result of a successful charge.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResult {
    /// The payment ID assigned by the payment collaborator.
    pub payment_id: String,
}

/// Trait for the payment collaborator.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Charges the user for a booking. Single attempt; callers do not retry.
    async fn charge(
        &self,
        booking_id: BookingId,
        amount: f64,
        user_id: UserId,
    ) -> Result<PaymentResult, BookingError>;
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    payments: HashMap<String, (BookingId, UserId, f64)>,
    next_id: u32,
    fail_on_charge: bool,
}

/// In-memory payment collaborator for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentService {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentService {
    /// Creates a new in-memory payment service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the double to decline charges.
    pub fn set_fail_on_charge(&self, fail: bool) {
        self.state.write().unwrap().fail_on_charge = fail;
    }

    /// Returns the number of settled payments.
    pub fn payment_count(&self) -> usize {
        self.state.read().unwrap().payments.len()
    }

    /// Returns true if a payment exists with the given ID.
    pub fn has_payment(&self, payment_id: &str) -> bool {
        self.state.read().unwrap().payments.contains_key(payment_id)
    }
}

#[async_trait]
impl PaymentService for InMemoryPaymentService {
    async fn charge(
        &self,
        booking_id: BookingId,
        amount: f64,
        user_id: UserId,
    ) -> Result<PaymentResult, BookingError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_charge {
            return Err(BookingError::Payment("Payment declined".to_string()));
        }

        state.next_id += 1;
        let payment_id = format!("PAY-{:04}", state.next_id);
        state
            .payments
            .insert(payment_id.clone(), (booking_id, user_id, amount));

        Ok(PaymentResult { payment_id })
    }
}

#[derive(Serialize)]
struct ChargeRequest {
    booking_id: BookingId,
    amount: f64,
    user_id: UserId,
}

/// HTTP client for the payment collaborator.
#[derive(Clone)]
pub struct HttpPaymentService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentService {
    /// Creates a client against `base_url` (e.g. `http://localhost:8003`).
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaymentService for HttpPaymentService {
    async fn charge(
        &self,
        booking_id: BookingId,
        amount: f64,
        user_id: UserId,
    ) -> Result<PaymentResult, BookingError> {
        let url = format!("{}/payments", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ChargeRequest {
                booking_id,
                amount,
                user_id,
            })
            .send()
            .await
            .map_err(|e| BookingError::ServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BookingError::Payment(format!(
                "payment service returned {}",
                response.status()
            )));
        }

        response
            .json::<PaymentResult>()
            .await
            .map_err(|e| BookingError::ServiceUnavailable(e.to_string()))
    }
}
