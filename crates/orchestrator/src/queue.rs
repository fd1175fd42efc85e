//! Post-commit task queue.
//!
//! An unbounded FIFO channel between the coordinator and the task runner.
//! Submission order is the only ordering guarantee between the two
//! post-commit steps; delivery is fire-and-forget, at most once.

use common::BookingId;
use tokio::sync::mpsc;

/// A background step to run after a booking commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTask {
    /// Settle payment and move the booking to confirmed/failed.
    ProcessPayment(BookingId),
    /// Report the booking's currently persisted status to the user.
    SendNotification(BookingId),
}

/// Sending half of the task queue, held by the coordinator.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<BookingTask>,
}

impl TaskQueue {
    /// Creates a queue, returning the sender and the receiver the runner
    /// drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BookingTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueues a task. If the runner is gone the task is dropped with a
    /// warning; there is no retry queue or dead letter.
    pub fn enqueue(&self, task: BookingTask) {
        if self.tx.send(task).is_err() {
            tracing::warn!(?task, "task runner stopped; dropping background task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tasks_arrive_in_submission_order() {
        let (queue, mut rx) = TaskQueue::new();
        let id = BookingId::new();

        queue.enqueue(BookingTask::ProcessPayment(id));
        queue.enqueue(BookingTask::SendNotification(id));

        assert_eq!(rx.recv().await, Some(BookingTask::ProcessPayment(id)));
        assert_eq!(rx.recv().await, Some(BookingTask::SendNotification(id)));
    }

    #[tokio::test]
    async fn enqueue_after_receiver_drop_is_silent() {
        let (queue, rx) = TaskQueue::new();
        drop(rx);
        // Must not panic or block.
        queue.enqueue(BookingTask::ProcessPayment(BookingId::new()));
    }
}
