//! Flight inventory collaborator: trait, in-memory double, HTTP client.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::FlightId;
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// The slice of flight state the coordinator needs: seat availability and
/// the current price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlightInfo {
    pub available_seats: i64,
    pub price: f64,
}

/// Trait for the inventory collaborator.
#[async_trait]
pub trait FlightInventoryService: Send + Sync {
    /// Fetches availability and price for a flight.
    async fn get_flight(&self, flight_id: FlightId) -> Result<FlightInfo, BookingError>;

    /// Overwrites the flight's available seat count.
    ///
    /// This is a plain write, not an atomic decrement; callers computing
    /// `current - 1` or `current + 1` own the read-modify-write race.
    async fn set_available_seats(
        &self,
        flight_id: FlightId,
        available_seats: i64,
    ) -> Result<(), BookingError>;
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    flights: HashMap<FlightId, FlightInfo>,
    fail_on_update: bool,
    unavailable: bool,
}

/// In-memory inventory collaborator for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlightInventory {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryFlightInventory {
    /// Creates a new empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a flight with the given availability and price.
    pub fn add_flight(&self, flight_id: FlightId, available_seats: i64, price: f64) {
        self.state.write().unwrap().flights.insert(
            flight_id,
            FlightInfo {
                available_seats,
                price,
            },
        );
    }

    /// Configures the double to fail seat-count updates.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }

    /// Simulates the collaborator being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Returns the current seat count for a flight, if registered.
    pub fn available_seats(&self, flight_id: FlightId) -> Option<i64> {
        self.state
            .read()
            .unwrap()
            .flights
            .get(&flight_id)
            .map(|f| f.available_seats)
    }
}

#[async_trait]
impl FlightInventoryService for InMemoryFlightInventory {
    async fn get_flight(&self, flight_id: FlightId) -> Result<FlightInfo, BookingError> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(BookingError::ServiceUnavailable(
                "flight service unreachable".to_string(),
            ));
        }
        state
            .flights
            .get(&flight_id)
            .copied()
            .ok_or(BookingError::FlightNotFound(flight_id))
    }

    async fn set_available_seats(
        &self,
        flight_id: FlightId,
        available_seats: i64,
    ) -> Result<(), BookingError> {
        let mut state = self.state.write().unwrap();
        if state.unavailable {
            return Err(BookingError::ServiceUnavailable(
                "flight service unreachable".to_string(),
            ));
        }
        if state.fail_on_update {
            return Err(BookingError::ServiceUnavailable(
                "flight seat update rejected".to_string(),
            ));
        }
        let flight = state
            .flights
            .get_mut(&flight_id)
            .ok_or(BookingError::FlightNotFound(flight_id))?;
        flight.available_seats = available_seats;
        Ok(())
    }
}

#[derive(Serialize)]
struct SeatUpdateRequest {
    available_seats: i64,
}

/// HTTP client for the inventory collaborator.
///
/// The base URL is explicit construction-time configuration; nothing here
/// reads ambient global state.
#[derive(Clone)]
pub struct HttpFlightInventory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFlightInventory {
    /// Creates a client against `base_url` (e.g. `http://localhost:8001`).
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl FlightInventoryService for HttpFlightInventory {
    async fn get_flight(&self, flight_id: FlightId) -> Result<FlightInfo, BookingError> {
        let url = format!("{}/flights/{}", self.base_url, flight_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BookingError::ServiceUnavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BookingError::FlightNotFound(flight_id));
        }
        if !response.status().is_success() {
            return Err(BookingError::ServiceUnavailable(format!(
                "flight service returned {}",
                response.status()
            )));
        }

        response
            .json::<FlightInfo>()
            .await
            .map_err(|e| BookingError::ServiceUnavailable(e.to_string()))
    }

    async fn set_available_seats(
        &self,
        flight_id: FlightId,
        available_seats: i64,
    ) -> Result<(), BookingError> {
        let url = format!("{}/flights/{}", self.base_url, flight_id);
        let response = self
            .client
            .put(&url)
            .json(&SeatUpdateRequest { available_seats })
            .send()
            .await
            .map_err(|e| BookingError::ServiceUnavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BookingError::FlightNotFound(flight_id));
        }
        if !response.status().is_success() {
            return Err(BookingError::ServiceUnavailable(format!(
                "flight service returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
