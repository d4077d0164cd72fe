//! Storage failures surface as opaque database errors, never as domain rejections.

use std::sync::Arc;

use anyhow::anyhow;
use assert_matches::assert_matches;
use async_trait::async_trait;
use mockall::mock;

use appointment_cell::models::{
    Appointment, AppointmentChanges, AppointmentError, AppointmentFilter, AppointmentQuery,
    CreateAppointmentRequest, NewAppointment,
};
use appointment_cell::{AppointmentBookingService, AppointmentStore};
use doctor_cell::models::{AvailabilityStatus, NewDoctor};
use doctor_cell::{DoctorStore, InMemoryDoctorStore};
use patient_cell::models::PatientRef;
use patient_cell::InMemoryPatientStore;
use shared_utils::test_utils::utc;
use shared_utils::{ClinicCalendar, SystemClock};

mock! {
    pub Appointments {}

    #[async_trait]
    impl AppointmentStore for Appointments {
        async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Appointment>>;
        async fn find_many(&self, filter: &AppointmentFilter) -> anyhow::Result<Vec<Appointment>>;
        async fn insert(&self, appointment: NewAppointment) -> anyhow::Result<Appointment>;
        async fn update(&self, id: i64, changes: &AppointmentChanges) -> anyhow::Result<Appointment>;
    }
}

async fn service_with(store: MockAppointments) -> AppointmentBookingService {
    let doctors = Arc::new(InMemoryDoctorStore::new());
    doctors.insert(NewDoctor {
        name: "Hale".to_string(),
        specialization: "General Practice".to_string(),
        gender: String::new(),
        location: String::new(),
        availability: None,
        working_hours: None,
        availability_status: AvailabilityStatus::Available,
        unavailability_reason: None,
    }).await.unwrap();

    AppointmentBookingService::new(
        Arc::new(store),
        doctors,
        Arc::new(InMemoryPatientStore::new()),
        Arc::new(SystemClock),
        ClinicCalendar::utc(),
    )
}

#[tokio::test]
async fn test_overlap_scan_failure_blocks_booking() {
    let mut store = MockAppointments::new();
    store.expect_find_many()
        .returning(|_| Err(anyhow!("connection reset")));
    store.expect_insert().never();

    let service = service_with(store).await;
    let result = service.create_appointment(CreateAppointmentRequest {
        doctor_id: 1,
        patient: PatientRef::WalkIn { name: None, phone: None, email: None },
        start_at: utc("2024-03-04T10:00:00Z"),
        end_at: utc("2024-03-04T11:00:00Z"),
        status: None,
    }).await;

    assert_matches!(result, Err(AppointmentError::DatabaseError(msg)) if msg.contains("connection reset"));
}

#[tokio::test]
async fn test_list_failure_propagates() {
    let mut store = MockAppointments::new();
    store.expect_find_many()
        .withf(|filter| filter.doctor_id == Some(3))
        .times(1)
        .returning(|_| Err(anyhow!("timeout")));

    let service = service_with(store).await;
    let result = service
        .list_appointments(AppointmentQuery { doctor_id: Some(3), ..Default::default() })
        .await;

    assert_matches!(result, Err(AppointmentError::DatabaseError(_)));
}

#[tokio::test]
async fn test_lookup_failure_is_not_not_found() {
    let mut store = MockAppointments::new();
    store.expect_find_by_id()
        .returning(|_| Err(anyhow!("permission denied")));

    let service = service_with(store).await;
    assert_matches!(service.mark_urgent(1).await, Err(AppointmentError::DatabaseError(_)));
}
