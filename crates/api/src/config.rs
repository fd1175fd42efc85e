//! Application configuration loaded from environment variables.

/// Server and collaborator configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8002`)
/// - `FLIGHT_SERVICE_URL` — inventory collaborator (default: `http://localhost:8001`)
/// - `PAYMENT_SERVICE_URL` — payment collaborator (default: `http://localhost:8003`)
/// - `NOTIFICATION_SERVICE_URL` — notification collaborator (default: `http://localhost:8004`)
/// - `REDIS_URL` — seat lock store; unset means the in-process lock
/// - `DATABASE_URL` — booking store; unset means the in-memory store
///
/// Collaborator endpoints are explicit values handed to the clients at
/// construction, never read back from ambient globals later.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub flight_service_url: String,
    pub payment_service_url: String,
    pub notification_service_url: String,
    pub redis_url: Option<String>,
    pub database_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8002),
            flight_service_url: std::env::var("FLIGHT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            payment_service_url: std::env::var("PAYMENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8003".to_string()),
            notification_service_url: std::env::var("NOTIFICATION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8004".to_string()),
            redis_url: std::env::var("REDIS_URL").ok(),
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8002,
            flight_service_url: "http://localhost:8001".to_string(),
            payment_service_url: "http://localhost:8003".to_string(),
            notification_service_url: "http://localhost:8004".to_string(),
            redis_url: None,
            database_url: None,
        }
    }
}
