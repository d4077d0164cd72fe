use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate};

use queue_cell::models::{EnqueueRequest, QueueStatus};
use queue_cell::{InMemoryQueueStore, QueueError, QueueSequencer};
use shared_utils::test_utils::utc;
use shared_utils::{ClinicCalendar, FixedClock};

fn setup(now: &str, calendar: ClinicCalendar) -> (Arc<QueueSequencer>, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(utc(now)));
    let sequencer = QueueSequencer::new(Arc::new(InMemoryQueueStore::new()), clock.clone(), calendar);
    (Arc::new(sequencer), clock)
}

fn walk_in(name: &str) -> EnqueueRequest {
    EnqueueRequest {
        patient_name: name.to_string(),
        patient_phone: None,
        urgent: None,
    }
}

#[tokio::test]
async fn test_numbers_are_sequential_and_reset_daily() {
    let (sequencer, clock) = setup("2024-03-04T08:00:00Z", ClinicCalendar::utc());

    let mut numbers = Vec::new();
    for name in ["Ada", "Ben", "Cleo"] {
        numbers.push(sequencer.enqueue(walk_in(name)).await.unwrap().queue_number);
        clock.advance(Duration::minutes(10));
    }
    assert_eq!(numbers, vec![1, 2, 3]);

    clock.set(utc("2024-03-05T07:30:00Z"));
    let next_day = sequencer.enqueue(walk_in("Dev")).await.unwrap();
    assert_eq!(next_day.queue_number, 1);
    assert_eq!(next_day.queue_day, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
}

#[tokio::test]
async fn test_numbering_counts_every_status() {
    let (sequencer, _) = setup("2024-03-04T08:00:00Z", ClinicCalendar::utc());

    let first = sequencer.enqueue(walk_in("Ada")).await.unwrap();
    sequencer.update_status(first.id, "completed").await.unwrap();
    let second = sequencer.enqueue(walk_in("Ben")).await.unwrap();

    assert_eq!(second.queue_number, 2);
}

#[tokio::test]
async fn test_day_boundary_follows_clinic_offset() {
    // UTC+3: 22:30Z on the 4th is already the 5th locally.
    let (sequencer, clock) = setup("2024-03-04T20:00:00Z", ClinicCalendar::with_offset_minutes(180));

    assert_eq!(sequencer.enqueue(walk_in("Ada")).await.unwrap().queue_number, 1);
    clock.set(utc("2024-03-04T22:30:00Z"));
    let after_midnight = sequencer.enqueue(walk_in("Ben")).await.unwrap();

    assert_eq!(after_midnight.queue_number, 1);
    assert_eq!(after_midnight.queue_day, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
}

#[tokio::test]
async fn test_urgent_entries_list_first() {
    let (sequencer, _) = setup("2024-03-04T08:00:00Z", ClinicCalendar::utc());

    let one = sequencer.enqueue(walk_in("Ada")).await.unwrap();
    let two = sequencer.enqueue(walk_in("Ben")).await.unwrap();
    let three = sequencer.enqueue(walk_in("Cleo")).await.unwrap();
    sequencer.mark_urgent(two.id).await.unwrap();

    let order: Vec<u32> = sequencer.list_queue().await.unwrap().iter().map(|e| e.queue_number).collect();
    assert_eq!(order, vec![two.queue_number, one.queue_number, three.queue_number]);
}

#[tokio::test]
async fn test_urgent_at_intake_keeps_arrival_number() {
    let (sequencer, _) = setup("2024-03-04T08:00:00Z", ClinicCalendar::utc());

    sequencer.enqueue(walk_in("Ada")).await.unwrap();
    let urgent = sequencer.enqueue(EnqueueRequest {
        patient_name: "Ben".to_string(),
        patient_phone: Some(" 555-0101 ".to_string()),
        urgent: Some(true),
    }).await.unwrap();

    assert_eq!(urgent.queue_number, 2);
    assert_eq!(urgent.patient_phone.as_deref(), Some("555-0101"));
    assert_eq!(urgent.status, QueueStatus::Waiting);
    assert_eq!(sequencer.list_queue().await.unwrap()[0].id, urgent.id);
}

#[tokio::test]
async fn test_mark_urgent_is_idempotent() {
    let (sequencer, _) = setup("2024-03-04T08:00:00Z", ClinicCalendar::utc());
    let entry = sequencer.enqueue(walk_in("Ada")).await.unwrap();

    let once = sequencer.mark_urgent(entry.id).await.unwrap();
    let twice = sequencer.mark_urgent(entry.id).await.unwrap();

    assert!(twice.urgent);
    assert_eq!(once, twice);
    assert_eq!(twice.queue_number, entry.queue_number);
    assert_matches!(sequencer.mark_urgent(99).await, Err(QueueError::NotFound));
}

#[tokio::test]
async fn test_update_status_accepts_token_or_key() {
    let (sequencer, _) = setup("2024-03-04T08:00:00Z", ClinicCalendar::utc());
    let entry = sequencer.enqueue(walk_in("Ada")).await.unwrap();

    let called = sequencer.update_status(entry.id, "WITH_DOCTOR").await.unwrap();
    assert_eq!(called.status, QueueStatus::WithDoctor);

    // No transition graph in the core.
    let back = sequencer.update_status(entry.id, "waiting").await.unwrap();
    assert_eq!(back.status, QueueStatus::Waiting);

    assert_matches!(sequencer.update_status(entry.id, "seen").await, Err(QueueError::InvalidStatus(s)) if s == "seen");
    assert_matches!(sequencer.update_status(99, "waiting").await, Err(QueueError::NotFound));
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let (sequencer, _) = setup("2024-03-04T08:00:00Z", ClinicCalendar::utc());
    assert_matches!(sequencer.enqueue(walk_in("  ")).await, Err(QueueError::ValidationError(_)));
    assert!(sequencer.list_queue().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_intake_issues_distinct_numbers() {
    let (sequencer, _) = setup("2024-03-04T08:00:00Z", ClinicCalendar::utc());

    let arrivals = (0..20).map(|i| {
        let sequencer = Arc::clone(&sequencer);
        tokio::spawn(async move { sequencer.enqueue(walk_in(&format!("Patient {i}"))).await })
    });

    let mut numbers: Vec<u32> = futures::future::join_all(arrivals)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().queue_number)
        .collect();
    numbers.sort_unstable();

    assert_eq!(numbers, (1..=20).collect::<Vec<u32>>());
}
