use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{CreatePatientRequest, NewPatient, Patient, PatientError, PatientSearchQuery};
use crate::store::PatientStore;

fn db_error(e: anyhow::Error) -> PatientError {
    PatientError::DatabaseError(e.to_string())
}

pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        debug!("Creating patient record for: {}", request.name);

        if request.name.trim().is_empty() {
            return Err(PatientError::ValidationError("Patient name is required".to_string()));
        }

        let patient = self.store
            .insert(NewPatient::walk_in(Some(request.name), request.phone, request.email))
            .await
            .map_err(db_error)?;

        info!("Patient created with ID: {}", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        debug!("Fetching patient: {}", patient_id);

        self.store.find_by_id(patient_id).await
            .map_err(db_error)?
            .ok_or(PatientError::NotFound)
    }

    pub async fn list_patients(&self, query: PatientSearchQuery) -> Result<Vec<Patient>, PatientError> {
        self.store.find_many(&query).await.map_err(db_error)
    }
}
