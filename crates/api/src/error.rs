//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orchestrator::BookingError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Booking orchestration error.
    Booking(BookingError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Booking(err) => booking_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn booking_error_to_response(err: BookingError) -> (StatusCode, String) {
    match &err {
        BookingError::FlightNotFound(_) | BookingError::BookingNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        BookingError::ServiceUnavailable(_) | BookingError::LockStore(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        BookingError::InsufficientInventory(_) | BookingError::AlreadyCancelled(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        BookingError::SeatConflict { .. } | BookingError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, err.to_string())
        }
        BookingError::Persistence(_)
        | BookingError::Payment(_)
        | BookingError::Notification(_) => {
            tracing::error!(error = %err, "unexpected orchestration error");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{BookingId, FlightId, SeatNumber};

    fn status_for(err: BookingError) -> StatusCode {
        booking_error_to_response(err).0
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_for(BookingError::FlightNotFound(FlightId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(BookingError::BookingNotFound(BookingId::new())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn seat_conflict_maps_to_409() {
        let err = BookingError::SeatConflict {
            flight_id: FlightId::new(1),
            seat_number: SeatNumber::new(2),
        };
        assert_eq!(status_for(err), StatusCode::CONFLICT);
    }

    #[test]
    fn outages_map_to_503() {
        assert_eq!(
            status_for(BookingError::ServiceUnavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn business_rejections_map_to_400() {
        assert_eq!(
            status_for(BookingError::InsufficientInventory(FlightId::new(1))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(BookingError::AlreadyCancelled(BookingId::new())),
            StatusCode::BAD_REQUEST
        );
    }
}
