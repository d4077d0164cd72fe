use std::cmp::Reverse;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use shared_utils::{ClinicCalendar, Clock};

use crate::error::QueueError;
use crate::models::{EnqueueRequest, NewQueueEntry, QueueEntry, QueueStatus};
use crate::store::QueueStore;

fn db_error(e: anyhow::Error) -> QueueError {
    QueueError::DatabaseError(e.to_string())
}

/// Urgent entries first, then arrival order. Numbers repeat across days, so
/// ties fall back to creation time.
pub fn sort_for_display(entries: &mut [QueueEntry]) {
    entries.sort_by_key(|e| (Reverse(e.urgent), e.queue_number, e.created_at, e.id));
}

/// Walk-in intake: hands out per-day queue numbers and tracks each entry's status.
pub struct QueueSequencer {
    store: Arc<dyn QueueStore>,
    clock: Arc<dyn Clock>,
    calendar: ClinicCalendar,
    intake: Mutex<()>,
}

impl QueueSequencer {
    pub fn new(store: Arc<dyn QueueStore>, clock: Arc<dyn Clock>, calendar: ClinicCalendar) -> Self {
        Self {
            store,
            clock,
            calendar,
            intake: Mutex::new(()),
        }
    }

    pub async fn enqueue(&self, request: EnqueueRequest) -> Result<QueueEntry, QueueError> {
        let patient_name = request.patient_name.trim().to_string();
        if patient_name.is_empty() {
            return Err(QueueError::ValidationError("Patient name is required".to_string()));
        }
        let patient_phone = request.patient_phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        // Read-max and insert must not interleave with another intake.
        let _intake = self.intake.lock().await;

        let now = self.clock.now();
        let today = self.calendar.day_of(now);
        let last = self.store.max_queue_number(&today).await.map_err(db_error)?;
        let queue_number = last.map_or(1, |n| n + 1);

        debug!("Issuing queue number {} for {}", queue_number, today.date);

        let entry = self.store.insert(NewQueueEntry {
            queue_number,
            queue_day: today.date,
            patient_name,
            patient_phone,
            status: QueueStatus::Waiting,
            urgent: request.urgent.unwrap_or(false),
            linked_appointment_id: None,
            created_at: now,
        }).await.map_err(db_error)?;

        info!("Walk-in {} queued as #{}", entry.id, entry.queue_number);
        Ok(entry)
    }

    pub async fn list_queue(&self) -> Result<Vec<QueueEntry>, QueueError> {
        let mut entries = self.store.find_all().await.map_err(db_error)?;
        sort_for_display(&mut entries);
        Ok(entries)
    }

    pub async fn get_entry(&self, entry_id: i64) -> Result<QueueEntry, QueueError> {
        self.store.find_by_id(entry_id).await
            .map_err(db_error)?
            .ok_or(QueueError::NotFound)
    }

    /// Any status may follow any other here; the workflow table is applied by callers.
    pub async fn update_status(&self, entry_id: i64, status: &str) -> Result<QueueEntry, QueueError> {
        debug!("Updating queue entry {} status to {}", entry_id, status);

        let entry = self.get_entry(entry_id).await?;
        let status: QueueStatus = status.parse()?;

        let saved = self.store.set_status(entry.id, status).await.map_err(db_error)?;
        info!("Queue entry #{} is now {}", saved.queue_number, saved.status);
        Ok(saved)
    }

    /// Raises display priority; the queue number is untouched.
    pub async fn mark_urgent(&self, entry_id: i64) -> Result<QueueEntry, QueueError> {
        let entry = self.get_entry(entry_id).await?;
        if entry.urgent {
            return Ok(entry);
        }

        let saved = self.store.set_urgent(entry.id).await.map_err(db_error)?;
        info!("Queue entry #{} marked urgent", saved.queue_number);
        Ok(saved)
    }
}
