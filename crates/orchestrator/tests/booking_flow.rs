//! End-to-end booking flow tests over the in-memory implementations.

use std::sync::Arc;
use std::time::Duration;

use booking_store::{BookingFilter, BookingStatus, InMemoryBookingStore};
use common::{FlightId, SeatNumber, UserId};
use orchestrator::{
    BookingCoordinator, BookingError, InMemoryFlightInventory, InMemoryNotificationService,
    InMemoryPaymentService, TaskQueue, TaskRunner,
};
use seat_lock::InMemorySeatLock;

const FLIGHT: FlightId = FlightId::new(7);

struct World {
    coordinator:
        Arc<BookingCoordinator<InMemorySeatLock, InMemoryBookingStore, InMemoryFlightInventory>>,
    store: InMemoryBookingStore,
    inventory: InMemoryFlightInventory,
    payment: InMemoryPaymentService,
    notification: InMemoryNotificationService,
    runner_handle: tokio::task::JoinHandle<()>,
}

/// Wires coordinator, queue and runner the way the API binary does.
fn bootstrap(seats: i64, price: f64) -> World {
    let locks = InMemorySeatLock::new();
    let store = InMemoryBookingStore::new();
    let inventory = InMemoryFlightInventory::new();
    inventory.add_flight(FLIGHT, seats, price);

    let payment = InMemoryPaymentService::new();
    let notification = InMemoryNotificationService::new();

    let (tasks, task_rx) = TaskQueue::new();
    let runner = TaskRunner::new(store.clone(), payment.clone(), notification.clone());
    let runner_handle = runner.spawn(task_rx);

    let coordinator = Arc::new(BookingCoordinator::new(
        locks,
        store.clone(),
        inventory.clone(),
        tasks,
    ));

    World {
        coordinator,
        store,
        inventory,
        payment,
        notification,
        runner_handle,
    }
}

/// Polls until the booking reaches a status other than `Pending`.
async fn wait_for_settlement(world: &World, id: common::BookingId) -> BookingStatus {
    for _ in 0..100 {
        let status = world.coordinator.booking_status(id).await.unwrap();
        if status != BookingStatus::Pending {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("booking never settled");
}

#[tokio::test]
async fn booking_settles_to_confirmed_after_response() {
    let world = bootstrap(1, 100.0);

    let booking = world
        .coordinator
        .create_booking(UserId::new(1), FLIGHT, SeatNumber::new(1))
        .await
        .unwrap();

    // The synchronous response is always pending; settlement happens behind it.
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_amount, 100.0);
    assert_eq!(world.inventory.available_seats(FLIGHT), Some(0));

    let settled = wait_for_settlement(&world, booking.id).await;
    assert_eq!(settled, BookingStatus::Confirmed);

    let loaded = world.coordinator.get_booking(booking.id).await.unwrap();
    assert!(loaded.payment_id.is_some());
    assert_eq!(world.payment.payment_count(), 1);
}

#[tokio::test]
async fn payment_decline_settles_to_failed() {
    let world = bootstrap(5, 100.0);
    world.payment.set_fail_on_charge(true);

    let booking = world
        .coordinator
        .create_booking(UserId::new(1), FLIGHT, SeatNumber::new(1))
        .await
        .unwrap();

    let settled = wait_for_settlement(&world, booking.id).await;
    assert_eq!(settled, BookingStatus::Failed);

    // Terminal: nothing moves it again.
    tokio::time::sleep(Duration::from_millis(30)).await;
    let status = world.coordinator.booking_status(booking.id).await.unwrap();
    assert_eq!(status, BookingStatus::Failed);
    assert_eq!(world.payment.payment_count(), 0);
}

#[tokio::test]
async fn notification_is_dispatched_for_new_booking() {
    let world = bootstrap(5, 100.0);

    let booking = world
        .coordinator
        .create_booking(UserId::new(1), FLIGHT, SeatNumber::new(1))
        .await
        .unwrap();

    for _ in 0..100 {
        if world.notification.sent_count() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let sent = world.notification.last_sent().expect("notification sent");
    assert_eq!(sent.booking_id, booking.id);
    assert_eq!(sent.user_id, UserId::new(1));
    assert_eq!(sent.amount, 100.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_for_one_seat_admit_exactly_one() {
    let world = bootstrap(10, 100.0);

    let mut handles = Vec::new();
    for user in 0..8 {
        let coordinator = world.coordinator.clone();
        handles.push(tokio::spawn(async move {
            coordinator
                .create_booking(UserId::new(user), FLIGHT, SeatNumber::new(1))
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(booking) => {
                assert_eq!(booking.status, BookingStatus::Pending);
                successes += 1;
            }
            Err(BookingError::SeatConflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    // Exactly one row and exactly one decrement.
    assert_eq!(world.store.row_count().await, 1);
    assert_eq!(world.inventory.available_seats(FLIGHT), Some(9));
}

#[tokio::test]
async fn cancelled_booking_frees_seat_for_next_user() {
    let world = bootstrap(1, 100.0);

    let booking = world
        .coordinator
        .create_booking(UserId::new(1), FLIGHT, SeatNumber::new(1))
        .await
        .unwrap();
    wait_for_settlement(&world, booking.id).await;

    world.coordinator.cancel_booking(booking.id).await.unwrap();
    assert_eq!(world.inventory.available_seats(FLIGHT), Some(1));

    let second = world
        .coordinator
        .create_booking(UserId::new(2), FLIGHT, SeatNumber::new(1))
        .await
        .unwrap();
    assert_eq!(second.user_id, UserId::new(2));

    let cancelled = world
        .coordinator
        .list_bookings(BookingFilter {
            status: Some(BookingStatus::Cancelled),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, booking.id);
}

#[tokio::test]
async fn runner_exits_when_queue_closes() {
    let world = bootstrap(1, 100.0);
    let booking = world
        .coordinator
        .create_booking(UserId::new(1), FLIGHT, SeatNumber::new(1))
        .await
        .unwrap();
    wait_for_settlement(&world, booking.id).await;

    // Dropping the coordinator drops the last queue sender.
    let World {
        coordinator,
        runner_handle,
        ..
    } = world;
    drop(coordinator);
    runner_handle.await.unwrap();
}
