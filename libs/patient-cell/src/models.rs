use serde::{Deserialize, Serialize};

pub const WALK_IN_NAME: &str = "Walk-in";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewPatient {
    /// A patient created on the spot at the desk. Missing or blank names
    /// become "Walk-in".
    pub fn walk_in(name: Option<String>, phone: Option<String>, email: Option<String>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| WALK_IN_NAME.to_string());

        Self {
            name,
            phone: non_blank(phone),
            email: non_blank(email),
        }
    }

    pub fn into_patient(self, id: i64) -> Patient {
        Patient {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Who an appointment is for: someone already on file, or a walk-in to be
/// registered together with the booking. An `existing` reference with a
/// missing or non-positive id reads as an anonymous walk-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", from = "PatientRefBody")]
pub enum PatientRef {
    Existing {
        id: i64,
    },
    WalkIn {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        phone: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PatientRefBody {
    Existing {
        #[serde(default)]
        id: i64,
    },
    WalkIn {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        phone: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
}

impl From<PatientRefBody> for PatientRef {
    fn from(body: PatientRefBody) -> Self {
        match body {
            PatientRefBody::Existing { id } if id > 0 => PatientRef::Existing { id },
            PatientRefBody::Existing { .. } => PatientRef::WalkIn { name: None, phone: None, email: None },
            PatientRefBody::WalkIn { name, phone, email } => PatientRef::WalkIn { name, phone, email },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientSearchQuery {
    /// Matched against the patient's name.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
