//! Booking orchestration: saga coordination and the post-commit pipeline.
//!
//! This crate sequences seat lock acquisition, inventory validation and
//! decrement, booking persistence, and compensation for the creation and
//! cancellation paths. It is a saga, not a transaction: each external
//! effect stands alone, and failures after a step are undone by explicit
//! compensating actions (delete the row, release the lock).
//!
//! Payment settlement and notification dispatch run after the synchronous
//! response, drained from a FIFO task queue by a dedicated worker. Both are
//! best-effort, single-attempt steps; their failures never reach the
//! original caller and are observable only by re-querying booking status.

pub mod coordinator;
pub mod error;
pub mod queue;
pub mod runner;
pub mod services;

pub use coordinator::BookingCoordinator;
pub use error::BookingError;
pub use queue::{BookingTask, TaskQueue};
pub use runner::TaskRunner;
pub use services::{
    BookingNotification, FlightInfo, FlightInventoryService, HttpFlightInventory,
    HttpNotificationService, HttpPaymentService, InMemoryFlightInventory,
    InMemoryNotificationService, InMemoryPaymentService, NotificationService, PaymentResult,
    PaymentService,
};
