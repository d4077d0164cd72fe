// libs/doctor-cell/src/services/availability.rs

use std::collections::HashSet;

use tracing::debug;

use crate::models::{AvailabilityStatus, Doctor, DoctorError, WorkingDay};

/// Checks a weekly template before it is stored.
///
/// Every working entry needs parsable `HH:MM` times with the end after the
/// start, and a weekday may appear at most once. Non-working entries are
/// accepted whatever their times say.
pub fn validate_working_hours_template(template: &[WorkingDay]) -> Result<(), DoctorError> {
    let mut seen = HashSet::new();

    for entry in template {
        if !seen.insert(entry.day) {
            return Err(DoctorError::WorkingHoursMalformed(format!(
                "{} appears more than once", entry.day
            )));
        }

        if !entry.is_working {
            continue;
        }

        let (start, end) = entry.minutes().ok_or_else(|| {
            DoctorError::WorkingHoursMalformed(format!(
                "{} needs start and end times in HH:MM format", entry.day
            ))
        })?;

        if end <= start {
            return Err(DoctorError::WorkingHoursMalformed(format!(
                "Invalid time range for {}. End time must be after start time.", entry.day
            )));
        }
    }

    debug!("Working hours template validated ({} entries)", template.len());
    Ok(())
}

/// Sets the availability flag. Marking a doctor available clears any stored
/// reason; a blank reason is stored as none.
pub fn apply_availability(doctor: &mut Doctor, status: AvailabilityStatus, reason: Option<String>) {
    doctor.availability_status = status;
    doctor.unavailability_reason = match status {
        AvailabilityStatus::Available => None,
        AvailabilityStatus::Unavailable => reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
    };
}
