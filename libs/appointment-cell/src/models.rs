use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use doctor_cell::models::{DoctorSummary, WeekdayName};
use patient_cell::models::{Patient, PatientRef};
use shared_utils::DayWindow;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor: DoctorSummary,
    pub patient: Patient,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub urgent: bool,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Canceled and skipped appointments free their slot.
    pub fn occupies_calendar(&self) -> bool {
        self.status.is_active()
    }

    pub fn overlaps(&self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> bool {
        self.start_at < end_at && start_at < self.end_at
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Booked,
    WithDoctor,
    Completed,
    Canceled,
    Skipped,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Booked,
        AppointmentStatus::WithDoctor,
        AppointmentStatus::Completed,
        AppointmentStatus::Canceled,
        AppointmentStatus::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::WithDoctor => "with_doctor",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Skipped => "skipped",
        }
    }

    /// Symbolic name accepted from callers alongside the canonical token.
    pub fn key(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "BOOKED",
            AppointmentStatus::WithDoctor => "WITH_DOCTOR",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Canceled => "CANCELED",
            AppointmentStatus::Skipped => "SKIPPED",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Canceled | AppointmentStatus::Skipped)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw || status.key() == raw)
            .ok_or_else(|| AppointmentError::InvalidStatus(raw.to_string()))
    }
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub doctor: DoctorSummary,
    pub patient: Patient,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub urgent: bool,
    pub created_at: DateTime<Utc>,
}

impl NewAppointment {
    pub fn into_appointment(self, id: i64) -> Appointment {
        Appointment {
            id,
            doctor: self.doctor,
            patient: self.patient,
            start_at: self.start_at,
            end_at: self.end_at,
            status: self.status,
            urgent: self.urgent,
            created_at: self.created_at,
        }
    }
}

/// Partial update. Only the fields that are set are written; everything else
/// keeps whatever the row holds at write time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AppointmentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgent: Option<bool>,
}

impl AppointmentChanges {
    pub fn status(status: AppointmentStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn urgent() -> Self {
        Self { urgent: Some(true), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(start_at) = self.start_at {
            appointment.start_at = start_at;
        }
        if let Some(end_at) = self.end_at {
            appointment.end_at = end_at;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(urgent) = self.urgent {
            appointment.urgent = urgent;
        }
    }
}

/// Store-level selection. Every field narrows the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    /// Keeps appointments whose start falls inside the window.
    pub window: Option<DayWindow>,
}

impl AppointmentFilter {
    pub fn for_doctor(doctor_id: i64) -> Self {
        Self {
            doctor_id: Some(doctor_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.doctor_id.map_or(true, |id| appointment.doctor.id == id)
            && self.patient_id.map_or(true, |id| appointment.patient.id == id)
            && self.window.map_or(true, |w| w.contains(appointment.start_at))
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub doctor_id: i64,
    pub patient: PatientRef,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// Defaults to `booked`.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentQuery {
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    /// Clinic-local calendar day, `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("End time must be after start time")]
    InvalidInterval,

    #[error("Dr. {doctor_name} is not available on {day}. Available days: {available_days}")]
    OutsideWorkingDay {
        doctor_name: String,
        day: WeekdayName,
        available_days: String,
    },

    #[error("Appointment time ({starts} - {ends}) is outside Dr. {doctor_name}'s working hours ({opens} - {closes}) on {day}")]
    OutsideWorkingHours {
        doctor_name: String,
        day: WeekdayName,
        starts: String,
        ends: String,
        opens: String,
        closes: String,
    },

    #[error("This time slot overlaps with an existing appointment for Dr. {doctor_name} ({starts} - {ends}) with patient {patient_name}")]
    TimeSlotConflict {
        appointment_id: i64,
        doctor_name: String,
        patient_name: String,
        starts: String,
        ends: String,
    },

    #[error("Working hours for {day} are malformed: {detail}")]
    WorkingHoursMalformed { day: WeekdayName, detail: String },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),
}
