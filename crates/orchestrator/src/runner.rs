//! Post-commit task runner: payment settlement and notification dispatch.

use booking_store::{BookingStatus, BookingStore};
use common::BookingId;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::queue::BookingTask;
use crate::services::{BookingNotification, NotificationService, PaymentService};

/// Drains the task queue and runs each step exactly once.
///
/// Every step loads the booking through its own store handle. There is no
/// retry, no backoff, no dead-letter queue, and no cancellation token: a
/// step that fails has failed for good, and a step still queued at process
/// termination never runs. The two steps for one booking are independent;
/// notification may observe the booking before payment has settled it.
pub struct TaskRunner<B, P, N>
where
    B: BookingStore,
    P: PaymentService,
    N: NotificationService,
{
    store: B,
    payment: P,
    notification: N,
}

impl<B, P, N> TaskRunner<B, P, N>
where
    B: BookingStore + 'static,
    P: PaymentService + 'static,
    N: NotificationService + 'static,
{
    /// Creates a runner over its own store session and collaborator clients.
    pub fn new(store: B, payment: P, notification: N) -> Self {
        Self {
            store,
            payment,
            notification,
        }
    }

    /// Spawns the drain loop on a dedicated tokio task.
    pub fn spawn(self, rx: UnboundedReceiver<BookingTask>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    /// Drains tasks until the queue closes.
    pub async fn run(self, mut rx: UnboundedReceiver<BookingTask>) {
        while let Some(task) = rx.recv().await {
            self.handle(task).await;
        }
        tracing::debug!("task queue closed; runner exiting");
    }

    /// Runs a single task. Errors are terminal for the task and never
    /// propagate; they are recorded on the booking row or logged.
    pub async fn handle(&self, task: BookingTask) {
        match task {
            BookingTask::ProcessPayment(id) => self.process_payment(id).await,
            BookingTask::SendNotification(id) => self.send_notification(id).await,
        }
    }

    #[tracing::instrument(skip(self))]
    async fn process_payment(&self, booking_id: BookingId) {
        let mut booking = match self.store.get(booking_id).await {
            Ok(Some(booking)) => booking,
            Ok(None) => {
                tracing::error!(%booking_id, "booking not found for payment processing");
                return;
            }
            Err(err) => {
                tracing::error!(%booking_id, error = %err, "failed to load booking for payment");
                return;
            }
        };

        match self
            .payment
            .charge(booking.id, booking.total_amount, booking.user_id)
            .await
        {
            Ok(result) => {
                booking.payment_id = Some(result.payment_id.clone());
                booking.status = BookingStatus::Confirmed;
                metrics::counter!("booking_payments_settled_total").increment(1);
                tracing::info!(%booking_id, payment_id = %result.payment_id, "payment processed");
            }
            Err(err) => {
                // Single attempt: a declined or unreachable collaborator
                // makes the booking terminally failed.
                booking.status = BookingStatus::Failed;
                metrics::counter!("booking_payments_failed_total").increment(1);
                tracing::error!(%booking_id, error = %err, "payment processing failed");
            }
        }

        if let Err(err) = self.store.update(&booking).await {
            tracing::error!(%booking_id, error = %err, "failed to persist payment outcome");
        }
    }

    #[tracing::instrument(skip(self))]
    async fn send_notification(&self, booking_id: BookingId) {
        let booking = match self.store.get(booking_id).await {
            Ok(Some(booking)) => booking,
            Ok(None) => {
                tracing::error!(%booking_id, "booking not found for notification");
                return;
            }
            Err(err) => {
                tracing::error!(%booking_id, error = %err, "failed to load booking for notification");
                return;
            }
        };

        // The message reports whatever status is persisted right now; if
        // payment has not settled yet this says "pending".
        let notification = BookingNotification {
            booking_id: booking.id,
            user_id: booking.user_id,
            flight_id: booking.flight_id,
            status: booking.status,
            amount: booking.total_amount,
        };

        match self.notification.notify(&notification).await {
            Ok(()) => {
                tracing::info!(%booking_id, "notification sent");
            }
            Err(err) => {
                // Logged and dropped; no dead-letter queue.
                tracing::error!(%booking_id, error = %err, "failed to send notification");
            }
        }
    }
}
