use std::sync::Arc;

use tracing::{debug, info, warn};

use doctor_cell::models::Doctor;
use doctor_cell::{DoctorLocks, DoctorStore};
use patient_cell::models::{NewPatient, Patient, PatientRef};
use patient_cell::PatientStore;
use shared_utils::{ClinicCalendar, Clock};

use crate::models::{
    Appointment, AppointmentChanges, AppointmentError, AppointmentFilter, AppointmentQuery,
    AppointmentStatus, CreateAppointmentRequest, NewAppointment, RescheduleAppointmentRequest,
};
use crate::services::conflict::ConflictResolver;
use crate::store::AppointmentStore;

fn db_error(e: anyhow::Error) -> AppointmentError {
    AppointmentError::DatabaseError(e.to_string())
}

/// Who the booking is for once the reference has been looked up. Walk-ins are
/// only written after every check has passed.
enum ResolvedPatient {
    OnFile(Patient),
    WalkIn(NewPatient),
}

pub struct AppointmentBookingService {
    appointments: Arc<dyn AppointmentStore>,
    doctors: Arc<dyn DoctorStore>,
    patients: Arc<dyn PatientStore>,
    resolver: ConflictResolver,
    clock: Arc<dyn Clock>,
    locks: Arc<DoctorLocks>,
}

impl AppointmentBookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        doctors: Arc<dyn DoctorStore>,
        patients: Arc<dyn PatientStore>,
        clock: Arc<dyn Clock>,
        calendar: ClinicCalendar,
    ) -> Self {
        let resolver = ConflictResolver::new(Arc::clone(&appointments), calendar);

        Self {
            appointments,
            doctors,
            patients,
            resolver,
            clock,
            locks: Arc::new(DoctorLocks::new()),
        }
    }

    /// Uses the given calendar locks instead of a private set, so doctor
    /// deletion can wait on in-flight bookings.
    pub fn with_locks(mut self, locks: Arc<DoctorLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn resolver(&self) -> &ConflictResolver {
        &self.resolver
    }

    async fn load_doctor(&self, doctor_id: i64) -> Result<Doctor, AppointmentError> {
        self.doctors.find_by_id(doctor_id).await
            .map_err(db_error)?
            .ok_or(AppointmentError::DoctorNotFound)
    }

    async fn resolve_patient(&self, patient: PatientRef) -> Result<ResolvedPatient, AppointmentError> {
        match patient {
            PatientRef::Existing { id } => {
                let patient = self.patients.find_by_id(id).await
                    .map_err(db_error)?
                    .ok_or(AppointmentError::PatientNotFound)?;
                Ok(ResolvedPatient::OnFile(patient))
            }
            PatientRef::WalkIn { name, phone, email } => {
                Ok(ResolvedPatient::WalkIn(NewPatient::walk_in(name, phone, email)))
            }
        }
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.appointments.find_by_id(appointment_id).await
            .map_err(db_error)?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn list_appointments(&self, query: AppointmentQuery) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments: {:?}", query);

        let filter = AppointmentFilter {
            doctor_id: query.doctor_id,
            patient_id: query.patient_id,
            window: query.date.map(|date| self.resolver.calendar().day_window(date)),
        };

        self.appointments.find_many(&filter).await.map_err(db_error)
    }

    pub async fn create_appointment(&self, request: CreateAppointmentRequest) -> Result<Appointment, AppointmentError> {
        debug!("Booking doctor {} from {} to {}", request.doctor_id, request.start_at, request.end_at);

        let status = match request.status.as_deref() {
            Some(raw) => raw.parse::<AppointmentStatus>()?,
            None => AppointmentStatus::Booked,
        };

        // Held from the doctor lookup to the insert.
        let _calendar = self.locks.lock(request.doctor_id).await;

        let doctor = self.load_doctor(request.doctor_id).await?;
        if request.end_at <= request.start_at {
            return Err(AppointmentError::InvalidInterval);
        }
        let patient = self.resolve_patient(request.patient).await?;

        if let Err(e) = self.resolver.check_slot(&doctor, request.start_at, request.end_at, None).await {
            warn!("Booking rejected for doctor {}: {}", doctor.id, e);
            return Err(e);
        }

        let patient = match patient {
            ResolvedPatient::OnFile(patient) => patient,
            ResolvedPatient::WalkIn(new_patient) => {
                let patient = self.patients.insert(new_patient).await.map_err(db_error)?;
                info!("Registered walk-in patient {} for booking", patient.id);
                patient
            }
        };

        let appointment = self.appointments.insert(NewAppointment {
            doctor: doctor.summary(),
            patient,
            start_at: request.start_at,
            end_at: request.end_at,
            status,
            urgent: false,
            created_at: self.clock.now(),
        }).await.map_err(db_error)?;

        info!("Appointment {} booked with doctor {}", appointment.id, doctor.id);
        Ok(appointment)
    }

    /// Moves an appointment and/or changes its status. Unsupplied bounds keep
    /// their current value; the new interval is checked against the
    /// appointment's own doctor, ignoring the appointment itself.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: i64,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Rescheduling appointment {}", appointment_id);

        let status = request.status.as_deref()
            .map(str::parse::<AppointmentStatus>)
            .transpose()?;

        let current = self.get_appointment(appointment_id).await?;
        let _calendar = self.locks.lock(current.doctor.id).await;

        // Re-read under the lock so the interval we check is the one we overwrite.
        let appointment = self.get_appointment(appointment_id).await?;
        let start_at = request.start_at.unwrap_or(appointment.start_at);
        let end_at = request.end_at.unwrap_or(appointment.end_at);
        let mut changes = AppointmentChanges { status, ..AppointmentChanges::default() };

        if start_at != appointment.start_at || end_at != appointment.end_at {
            if end_at <= start_at {
                return Err(AppointmentError::InvalidInterval);
            }
            let doctor = self.load_doctor(appointment.doctor.id).await?;
            if let Err(e) = self.resolver.check_slot(&doctor, start_at, end_at, Some(appointment.id)).await {
                warn!("Reschedule rejected for appointment {}: {}", appointment.id, e);
                return Err(e);
            }
            changes.start_at = Some(start_at);
            changes.end_at = Some(end_at);
        }

        if changes.is_empty() {
            return Ok(appointment);
        }

        let saved = self.appointments.update(appointment.id, &changes).await.map_err(db_error)?;
        info!("Appointment {} now {} from {} to {}", saved.id, saved.status, saved.start_at, saved.end_at);
        Ok(saved)
    }

    /// Any status may follow any other here; the workflow table is applied by callers.
    /// Only the status column is written.
    pub async fn set_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Setting appointment {} status to {}", appointment_id, status);

        let current = self.get_appointment(appointment_id).await?;
        let _calendar = self.locks.lock(current.doctor.id).await;

        let saved = self.appointments
            .update(appointment_id, &AppointmentChanges::status(status))
            .await
            .map_err(db_error)?;
        info!("Appointment {} status set to {}", saved.id, saved.status);
        Ok(saved)
    }

    pub async fn cancel_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.set_status(appointment_id, AppointmentStatus::Canceled).await
    }

    pub async fn mark_urgent(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        debug!("Marking appointment {} urgent", appointment_id);

        let appointment = self.get_appointment(appointment_id).await?;
        if appointment.urgent {
            return Ok(appointment);
        }

        let saved = self.appointments
            .update(appointment_id, &AppointmentChanges::urgent())
            .await
            .map_err(db_error)?;
        info!("Appointment {} marked urgent", saved.id);
        Ok(saved)
    }
}
