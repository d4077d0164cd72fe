use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueueError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    #[default]
    Waiting,
    WithDoctor,
    Completed,
    Skipped,
}

impl QueueStatus {
    pub const ALL: [QueueStatus; 4] = [
        QueueStatus::Waiting,
        QueueStatus::WithDoctor,
        QueueStatus::Completed,
        QueueStatus::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Waiting => "waiting",
            QueueStatus::WithDoctor => "with_doctor",
            QueueStatus::Completed => "completed",
            QueueStatus::Skipped => "skipped",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            QueueStatus::Waiting => "WAITING",
            QueueStatus::WithDoctor => "WITH_DOCTOR",
            QueueStatus::Completed => "COMPLETED",
            QueueStatus::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = QueueError;

    /// Accepts the canonical token (`with_doctor`) or the symbolic key (`WITH_DOCTOR`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        QueueStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw || status.key() == raw)
            .ok_or_else(|| QueueError::InvalidStatus(raw.to_string()))
    }
}

/// A walk-in waiting to be seen. `queue_number` restarts at 1 every clinic day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: i64,
    pub queue_number: u32,
    pub queue_day: NaiveDate,
    pub patient_name: String,
    #[serde(default)]
    pub patient_phone: Option<String>,
    pub status: QueueStatus,
    #[serde(default)]
    pub urgent: bool,
    /// Reserved for linking a walk-in to a booked appointment; no flow sets it yet.
    #[serde(default)]
    pub linked_appointment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQueueEntry {
    pub queue_number: u32,
    pub queue_day: NaiveDate,
    pub patient_name: String,
    pub patient_phone: Option<String>,
    pub status: QueueStatus,
    pub urgent: bool,
    pub linked_appointment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl NewQueueEntry {
    pub fn into_entry(self, id: i64) -> QueueEntry {
        QueueEntry {
            id,
            queue_number: self.queue_number,
            queue_day: self.queue_day,
            patient_name: self.patient_name,
            patient_phone: self.patient_phone,
            status: self.status,
            urgent: self.urgent,
            linked_appointment_id: self.linked_appointment_id,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub patient_name: String,
    #[serde(default)]
    pub patient_phone: Option<String>,
    #[serde(default)]
    pub urgent: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQueueStatusRequest {
    pub status: String,
}
