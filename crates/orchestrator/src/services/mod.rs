//! Collaborator traits, in-memory doubles, and HTTP clients.

pub mod inventory;
pub mod notification;
pub mod payment;

pub use inventory::{
    FlightInfo, FlightInventoryService, HttpFlightInventory, InMemoryFlightInventory,
};
pub use notification::{
    BookingNotification, HttpNotificationService, InMemoryNotificationService,
    NotificationService,
};
pub use payment::{HttpPaymentService, InMemoryPaymentService, PaymentResult, PaymentService};
