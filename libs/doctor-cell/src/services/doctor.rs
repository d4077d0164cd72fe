use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_database::supabase::is_conflict;

use crate::models::{
    CreateDoctorRequest, Doctor, DoctorError, DoctorSearchFilters, NewDoctor,
    UpdateAvailabilityRequest, UpdateDoctorRequest, AvailabilityStatus,
};
use crate::services::availability::{apply_availability, validate_working_hours_template};
use crate::services::calendar_lock::DoctorLocks;
use crate::store::{DoctorDependents, DoctorStore};

fn db_error(e: anyhow::Error) -> DoctorError {
    DoctorError::DatabaseError(e.to_string())
}

pub struct DoctorService {
    store: Arc<dyn DoctorStore>,
    dependents: Arc<dyn DoctorDependents>,
    locks: Arc<DoctorLocks>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn DoctorStore>, dependents: Arc<dyn DoctorDependents>) -> Self {
        Self {
            store,
            dependents,
            locks: Arc::new(DoctorLocks::new()),
        }
    }

    /// Shares the calendar locks with the booking side so a delete cannot
    /// interleave with a booking for the same doctor.
    pub fn with_locks(mut self, locks: Arc<DoctorLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn store(&self) -> Arc<dyn DoctorStore> {
        Arc::clone(&self.store)
    }

    pub async fn list_doctors(&self, filters: DoctorSearchFilters) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors with filters: {:?}", filters);
        self.store.find_many(&filters).await.map_err(db_error)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor profile: {}", doctor_id);
        self.store.find_by_id(doctor_id).await
            .map_err(db_error)?
            .ok_or(DoctorError::NotFound)
    }

    /// Create a new doctor profile
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating doctor profile for: {}", request.name);

        if request.specialization.trim().is_empty() {
            return Err(DoctorError::SpecializationRequired);
        }
        if request.name.trim().is_empty() {
            return Err(DoctorError::ValidationError("Doctor name is required".to_string()));
        }
        if let Some(template) = &request.working_hours {
            validate_working_hours_template(template)?;
        }

        let doctor = self.store.insert(NewDoctor {
            name: request.name.trim().to_string(),
            specialization: request.specialization.trim().to_string(),
            gender: request.gender,
            location: request.location,
            availability: request.availability,
            working_hours: request.working_hours,
            availability_status: AvailabilityStatus::Available,
            unavailability_reason: None,
        }).await.map_err(db_error)?;

        info!("Doctor profile created with ID: {}", doctor.id);
        Ok(doctor)
    }

    /// Update doctor profile; only the supplied fields change.
    pub async fn update_doctor(
        &self,
        doctor_id: i64,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor profile: {}", doctor_id);

        let mut doctor = self.get_doctor(doctor_id).await?;

        if let Some(specialization) = request.specialization {
            if specialization.trim().is_empty() {
                return Err(DoctorError::SpecializationRequired);
            }
            doctor.specialization = specialization.trim().to_string();
        }
        if let Some(template) = request.working_hours {
            validate_working_hours_template(&template)?;
            doctor.working_hours = Some(template);
        }
        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(DoctorError::ValidationError("Doctor name is required".to_string()));
            }
            doctor.name = name.trim().to_string();
        }
        if let Some(gender) = request.gender {
            doctor.gender = gender;
        }
        if let Some(location) = request.location {
            doctor.location = location;
        }
        if let Some(availability) = request.availability {
            doctor.availability = Some(availability);
        }

        self.store.save(&doctor).await.map_err(db_error)
    }

    pub async fn update_availability(
        &self,
        doctor_id: i64,
        request: UpdateAvailabilityRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Setting doctor {} availability to {:?}", doctor_id, request.availability_status);

        let mut doctor = self.get_doctor(doctor_id).await?;
        apply_availability(&mut doctor, request.availability_status, request.unavailability_reason);

        let saved = self.store.save(&doctor).await.map_err(db_error)?;
        info!("Doctor {} is now {:?}", doctor_id, saved.availability_status);
        Ok(saved)
    }

    /// Deletes a doctor that no appointment references.
    pub async fn delete_doctor(&self, doctor_id: i64) -> Result<(), DoctorError> {
        debug!("Deleting doctor: {}", doctor_id);

        let _calendar = self.locks.lock(doctor_id).await;
        self.get_doctor(doctor_id).await?;

        if self.dependents.has_appointments(doctor_id).await.map_err(db_error)? {
            warn!("Refusing to delete doctor {} with existing appointments", doctor_id);
            return Err(DoctorError::HasAppointments);
        }

        self.store.delete(doctor_id).await.map_err(|e| {
            // FK violation from the hosted store when a booking slipped in meanwhile
            if is_conflict(&e) {
                DoctorError::HasAppointments
            } else {
                db_error(e)
            }
        })?;

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }
}
