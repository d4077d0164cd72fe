use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

// ==============================================================================
// WORKING HOURS TEMPLATE
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekdayName {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekdayName {
    pub const ALL: [WeekdayName; 7] = [
        WeekdayName::Monday,
        WeekdayName::Tuesday,
        WeekdayName::Wednesday,
        WeekdayName::Thursday,
        WeekdayName::Friday,
        WeekdayName::Saturday,
        WeekdayName::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekdayName::Monday => "Monday",
            WeekdayName::Tuesday => "Tuesday",
            WeekdayName::Wednesday => "Wednesday",
            WeekdayName::Thursday => "Thursday",
            WeekdayName::Friday => "Friday",
            WeekdayName::Saturday => "Saturday",
            WeekdayName::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for WeekdayName {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => WeekdayName::Monday,
            Weekday::Tue => WeekdayName::Tuesday,
            Weekday::Wed => WeekdayName::Wednesday,
            Weekday::Thu => WeekdayName::Thursday,
            Weekday::Fri => WeekdayName::Friday,
            Weekday::Sat => WeekdayName::Saturday,
            Weekday::Sun => WeekdayName::Sunday,
        }
    }
}

impl fmt::Display for WeekdayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weekday of a doctor's fixed weekly schedule. Times are `HH:MM` on the
/// clinic wall clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDay {
    pub day: WeekdayName,
    pub is_working: bool,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl WorkingDay {
    pub fn working(day: WeekdayName, start_time: &str, end_time: &str) -> Self {
        Self {
            day,
            is_working: true,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }

    pub fn day_off(day: WeekdayName) -> Self {
        Self {
            day,
            is_working: false,
            start_time: String::new(),
            end_time: String::new(),
        }
    }

    /// Opening and closing minute-of-day, or `None` when either time is unparsable.
    pub fn minutes(&self) -> Option<(u32, u32)> {
        Some((parse_clock_minutes(&self.start_time)?, parse_clock_minutes(&self.end_time)?))
    }

    pub fn describe(&self) -> String {
        format!("{} ({} - {})", self.day, self.start_time, self.end_time)
    }
}

/// Parses `HH:MM` into minutes since midnight.
pub fn parse_clock_minutes(raw: &str) -> Option<u32> {
    use chrono::Timelike;

    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()?;
    Some(time.hour() * 60 + time.minute())
}

/// "Monday (09:00 - 17:00), Tuesday (...)" for every working day, or "None set".
pub fn working_days_summary(template: &[WorkingDay]) -> String {
    let days: Vec<String> = template.iter()
        .filter(|wh| wh.is_working)
        .map(WorkingDay::describe)
        .collect();

    if days.is_empty() {
        "None set".to_string()
    } else {
        days.join(", ")
    }
}

// ==============================================================================
// DOCTOR PROFILE
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Unavailable,
}

/// Slot list kept from the first schedule format. Stored and returned, never
/// consulted when booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAvailability {
    pub day: String,
    pub slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub availability: Option<Vec<LegacyAvailability>>,
    #[serde(default)]
    pub working_hours: Option<Vec<WorkingDay>>,
    #[serde(default)]
    pub availability_status: AvailabilityStatus,
    #[serde(default)]
    pub unavailability_reason: Option<String>,
}

impl Doctor {
    pub fn summary(&self) -> DoctorSummary {
        DoctorSummary {
            id: self.id,
            name: self.name.clone(),
            specialization: self.specialization.clone(),
        }
    }

    /// The weekly template, if one has been configured. An empty list counts
    /// as "not configured".
    pub fn working_hours_template(&self) -> Option<&[WorkingDay]> {
        self.working_hours.as_deref().filter(|template| !template.is_empty())
    }
}

/// The slice of a doctor embedded in other records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: i64,
    pub name: String,
    pub specialization: String,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub location: String,
    pub availability: Option<Vec<LegacyAvailability>>,
    pub working_hours: Option<Vec<WorkingDay>>,
    pub availability_status: AvailabilityStatus,
    pub unavailability_reason: Option<String>,
}

impl NewDoctor {
    pub fn into_doctor(self, id: i64) -> Doctor {
        Doctor {
            id,
            name: self.name,
            specialization: self.specialization,
            gender: self.gender,
            location: self.location,
            availability: self.availability,
            working_hours: self.working_hours,
            availability_status: self.availability_status,
            unavailability_reason: self.unavailability_reason,
        }
    }
}

impl From<&Doctor> for NewDoctor {
    fn from(doctor: &Doctor) -> Self {
        Self {
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            gender: doctor.gender.clone(),
            location: doctor.location.clone(),
            availability: doctor.availability.clone(),
            working_hours: doctor.working_hours.clone(),
            availability_status: doctor.availability_status,
            unavailability_reason: doctor.unavailability_reason.clone(),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub location: String,
    pub availability: Option<Vec<LegacyAvailability>>,
    pub working_hours: Option<Vec<WorkingDay>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub availability: Option<Vec<LegacyAvailability>>,
    pub working_hours: Option<Vec<WorkingDay>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability_status: AvailabilityStatus,
    pub unavailability_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSearchFilters {
    pub specialization: Option<String>,
    pub location: Option<String>,
    /// Matched against the doctor's name.
    pub q: Option<String>,
}

impl DoctorSearchFilters {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle.as_deref().map(str::trim) {
                None | Some("") => true,
                Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
            }
        }

        contains(&doctor.specialization, &self.specialization)
            && contains(&doctor.location, &self.location)
            && contains(&doctor.name, &self.q)
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Specialization is required and cannot be empty.")]
    SpecializationRequired,

    #[error("Invalid working hours: {0}")]
    WorkingHoursMalformed(String),

    #[error("Cannot delete doctor with existing appointments")]
    HasAppointments,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
