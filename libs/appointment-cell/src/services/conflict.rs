use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use doctor_cell::models::{working_days_summary, Doctor, WeekdayName};
use shared_utils::ClinicCalendar;

use crate::models::{Appointment, AppointmentError, AppointmentFilter};
use crate::store::AppointmentStore;

pub fn validate_interval(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<(), AppointmentError> {
    if end_at <= start_at {
        return Err(AppointmentError::InvalidInterval);
    }
    Ok(())
}

/// Checks `[start_at, end_at)` against the doctor's weekly template on the
/// clinic wall clock. Doctors without a template accept any interval.
pub fn validate_working_hours(
    calendar: &ClinicCalendar,
    doctor: &Doctor,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> Result<(), AppointmentError> {
    let Some(template) = doctor.working_hours_template() else {
        return Ok(());
    };

    let day = WeekdayName::from(calendar.weekday(start_at));
    let entry = template.iter()
        .find(|wh| wh.day == day)
        .filter(|wh| wh.is_working)
        .ok_or_else(|| AppointmentError::OutsideWorkingDay {
            doctor_name: doctor.name.clone(),
            day,
            available_days: working_days_summary(template),
        })?;

    let (opens, closes) = entry.minutes().ok_or_else(|| AppointmentError::WorkingHoursMalformed {
        day,
        detail: format!("cannot read '{}' - '{}' as HH:MM", entry.start_time, entry.end_time),
    })?;

    let outside = || AppointmentError::OutsideWorkingHours {
        doctor_name: doctor.name.clone(),
        day,
        starts: calendar.format_clock(start_at),
        ends: calendar.format_clock(end_at),
        opens: entry.start_time.clone(),
        closes: entry.end_time.clone(),
    };

    // Minute-of-day is only comparable while both ends sit on the same local date.
    if calendar.local_date(end_at) != calendar.local_date(start_at) {
        return Err(outside());
    }

    if calendar.minute_of_day(start_at) < opens || calendar.minute_of_day(end_at) > closes {
        return Err(outside());
    }

    Ok(())
}

/// First active appointment overlapping `[start_at, end_at)`, skipping `exclude_id`.
pub fn find_conflict(
    existing: &[Appointment],
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    exclude_id: Option<i64>,
) -> Option<&Appointment> {
    existing.iter()
        .filter(|a| Some(a.id) != exclude_id)
        .filter(|a| a.occupies_calendar())
        .find(|a| a.overlaps(start_at, end_at))
}

/// Availability & conflict checks shared by booking and rescheduling.
pub struct ConflictResolver {
    store: Arc<dyn AppointmentStore>,
    calendar: ClinicCalendar,
}

impl ConflictResolver {
    pub fn new(store: Arc<dyn AppointmentStore>, calendar: ClinicCalendar) -> Self {
        Self { store, calendar }
    }

    pub fn calendar(&self) -> &ClinicCalendar {
        &self.calendar
    }

    pub async fn check_overlap(
        &self,
        doctor_id: i64,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        exclude_appointment_id: Option<i64>,
    ) -> Result<(), AppointmentError> {
        debug!("Checking overlaps for doctor {} from {} to {}", doctor_id, start_at, end_at);

        let existing = self.store
            .find_many(&AppointmentFilter::for_doctor(doctor_id))
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        match find_conflict(&existing, start_at, end_at, exclude_appointment_id) {
            Some(conflict) => {
                warn!("Slot for doctor {} overlaps appointment {}", doctor_id, conflict.id);
                Err(AppointmentError::TimeSlotConflict {
                    appointment_id: conflict.id,
                    doctor_name: conflict.doctor.name.clone(),
                    patient_name: conflict.patient.name.clone(),
                    starts: self.calendar.format_clock(conflict.start_at),
                    ends: self.calendar.format_clock(conflict.end_at),
                })
            }
            None => Ok(()),
        }
    }

    /// Interval, working hours, then overlap. Nothing is written.
    pub async fn check_slot(
        &self,
        doctor: &Doctor,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        exclude_appointment_id: Option<i64>,
    ) -> Result<(), AppointmentError> {
        validate_interval(start_at, end_at)?;
        validate_working_hours(&self.calendar, doctor, start_at, end_at)?;
        self.check_overlap(doctor.id, start_at, end_at, exclude_appointment_id).await
    }
}
