//! Fixtures shared by the cells' test suites.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub clinic_utc_offset_minutes: i32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            clinic_utc_offset_minutes: 0,
        }
    }
}

impl TestConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            clinic_utc_offset_minutes: self.clinic_utc_offset_minutes,
            ..AppConfig::default()
        }
    }
}

/// Parses an RFC 3339 timestamp; panics on malformed input.
pub fn utc(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap_or_else(|e| panic!("bad test timestamp {rfc3339}: {e}"))
        .with_timezone(&Utc)
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    /// Monday to Friday 09:00-17:00, weekend off.
    pub fn weekday_template() -> Value {
        let working = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
        let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
        Value::Array(
            days.iter()
                .map(|day| json!({
                    "day": day,
                    "is_working": working.contains(day),
                    "start_time": "09:00",
                    "end_time": "17:00"
                }))
                .collect(),
        )
    }

    pub fn doctor_row(id: i64, name: &str, working_hours: Option<Value>) -> Value {
        json!({
            "id": id,
            "name": name,
            "specialization": "General Practice",
            "gender": "female",
            "location": "Room 1",
            "availability": null,
            "working_hours": working_hours,
            "availability_status": "available",
            "unavailability_reason": null
        })
    }

    pub fn patient_row(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "phone": null,
            "email": null
        })
    }

    pub fn appointment_row(
        id: i64,
        doctor: (i64, &str),
        patient: (i64, &str),
        start_at: &str,
        end_at: &str,
        status: &str,
    ) -> Value {
        json!({
            "id": id,
            "doctor_id": doctor.0,
            "patient_id": patient.0,
            "start_at": start_at,
            "end_at": end_at,
            "status": status,
            "urgent": false,
            "created_at": "2024-01-01T00:00:00Z",
            "doctor": {
                "id": doctor.0,
                "name": doctor.1,
                "specialization": "General Practice"
            },
            "patient": Self::patient_row(patient.0, patient.1)
        })
    }

    pub fn queue_entry_row(id: i64, queue_number: u32, patient_name: &str, urgent: bool, created_at: &str) -> Value {
        json!({
            "id": id,
            "queue_number": queue_number,
            "queue_day": &created_at[..10],
            "patient_name": patient_name,
            "patient_phone": null,
            "status": "waiting",
            "urgent": urgent,
            "linked_appointment_id": null,
            "created_at": created_at
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
