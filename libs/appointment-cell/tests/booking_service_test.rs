use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate};

use appointment_cell::models::{
    AppointmentError, AppointmentQuery, AppointmentStatus, CreateAppointmentRequest,
    RescheduleAppointmentRequest,
};
use appointment_cell::{AppointmentBookingService, InMemoryAppointmentStore};
use doctor_cell::models::{AvailabilityStatus, Doctor, NewDoctor, WeekdayName, WorkingDay};
use doctor_cell::{DoctorStore, InMemoryDoctorStore};
use patient_cell::models::{NewPatient, PatientRef, PatientSearchQuery};
use patient_cell::{InMemoryPatientStore, PatientStore};
use shared_utils::test_utils::utc;
use shared_utils::{ClinicCalendar, FixedClock};

// 2024-03-04 is a Monday, 2024-03-10 a Sunday.
const NOW: &str = "2024-03-01T08:00:00Z";

struct Fixture {
    service: Arc<AppointmentBookingService>,
    doctors: Arc<InMemoryDoctorStore>,
    patients: Arc<InMemoryPatientStore>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_calendar(ClinicCalendar::utc())
    }

    fn with_calendar(calendar: ClinicCalendar) -> Self {
        let doctors = Arc::new(InMemoryDoctorStore::new());
        let patients = Arc::new(InMemoryPatientStore::new());
        let service = AppointmentBookingService::new(
            Arc::new(InMemoryAppointmentStore::new()),
            doctors.clone(),
            patients.clone(),
            Arc::new(FixedClock::new(utc(NOW))),
            calendar,
        );

        Self {
            service: Arc::new(service),
            doctors,
            patients,
        }
    }

    async fn doctor(&self, name: &str, working_hours: Option<Vec<WorkingDay>>) -> Doctor {
        self.doctors.insert(NewDoctor {
            name: name.to_string(),
            specialization: "General Practice".to_string(),
            gender: "female".to_string(),
            location: "Room 1".to_string(),
            availability: None,
            working_hours,
            availability_status: AvailabilityStatus::Available,
            unavailability_reason: None,
        }).await.unwrap()
    }

    async fn monday_doctor(&self) -> Doctor {
        self.doctor("Hale", Some(vec![
            WorkingDay::working(WeekdayName::Monday, "09:00", "17:00"),
            WorkingDay::working(WeekdayName::Tuesday, "12:00", "18:00"),
            WorkingDay::day_off(WeekdayName::Sunday),
        ])).await
    }

    async fn patient(&self, name: &str) -> i64 {
        self.patients
            .insert(NewPatient::walk_in(Some(name.to_string()), None, None))
            .await
            .unwrap()
            .id
    }
}

fn booking(doctor_id: i64, patient_id: i64, start: &str, end: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        doctor_id,
        patient: PatientRef::Existing { id: patient_id },
        start_at: utc(start),
        end_at: utc(end),
        status: None,
    }
}

fn walk_in(doctor_id: i64, name: Option<&str>, start: &str, end: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        doctor_id,
        patient: PatientRef::WalkIn {
            name: name.map(str::to_string),
            phone: Some("555-0100".to_string()),
            email: None,
        },
        start_at: utc(start),
        end_at: utc(end),
        status: None,
    }
}

#[tokio::test]
async fn test_back_to_back_bookings_do_not_conflict() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    let second = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T11:00:00Z", "2024-03-04T12:00:00Z")).await;

    assert!(second.is_ok());
}

#[tokio::test]
async fn test_overlap_is_rejected_with_details() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let ada = fx.patient("Ada").await;
    let ben = fx.patient("Ben").await;

    let first = fx.service.create_appointment(booking(doctor.id, ada, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    let err = fx.service
        .create_appointment(booking(doctor.id, ben, "2024-03-04T10:30:00Z", "2024-03-04T10:45:00Z"))
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::TimeSlotConflict { appointment_id, .. } if appointment_id == first.id);
    assert_eq!(
        err.to_string(),
        "This time slot overlaps with an existing appointment for Dr. Hale (10:00 - 11:00) with patient Ada"
    );
}

#[tokio::test]
async fn test_other_doctors_do_not_conflict() {
    let fx = Fixture::new();
    let hale = fx.monday_doctor().await;
    let ito = fx.doctor("Ito", None).await;
    let patient = fx.patient("Ada").await;

    fx.service.create_appointment(booking(hale.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    assert!(fx.service.create_appointment(booking(ito.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.is_ok());
}

#[tokio::test]
async fn test_outside_hours_and_days_are_rejected() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let early = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T08:00:00Z", "2024-03-04T08:30:00Z")).await;
    assert_matches!(early, Err(AppointmentError::OutsideWorkingHours { .. }));

    let late = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T16:30:00Z", "2024-03-04T17:30:00Z")).await;
    assert_matches!(late, Err(AppointmentError::OutsideWorkingHours { .. }));

    let sunday = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-10T10:00:00Z", "2024-03-10T10:30:00Z")).await.unwrap_err();
    assert_eq!(
        sunday.to_string(),
        "Dr. Hale is not available on Sunday. Available days: Monday (09:00 - 17:00), Tuesday (12:00 - 18:00)"
    );
}

#[tokio::test]
async fn test_doctor_without_template_accepts_any_time() {
    let fx = Fixture::new();
    let doctor = fx.doctor("Ito", None).await;
    let patient = fx.patient("Ada").await;

    let sunday_night = fx.service
        .create_appointment(booking(doctor.id, patient, "2024-03-10T02:00:00Z", "2024-03-10T03:00:00Z"))
        .await;
    assert!(sunday_night.is_ok());

    let overlapping = fx.service
        .create_appointment(booking(doctor.id, patient, "2024-03-10T02:30:00Z", "2024-03-10T03:30:00Z"))
        .await;
    assert_matches!(overlapping, Err(AppointmentError::TimeSlotConflict { .. }));
}

#[tokio::test]
async fn test_unavailable_doctor_can_still_be_booked() {
    let fx = Fixture::new();
    let mut doctor = fx.monday_doctor().await;
    doctor.availability_status = AvailabilityStatus::Unavailable;
    doctor.unavailability_reason = Some("Conference".to_string());
    fx.doctors.save(&doctor).await.unwrap();
    let patient = fx.patient("Ada").await;

    assert!(fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.is_ok());
}

#[tokio::test]
async fn test_invalid_interval_and_missing_references() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let backwards = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T11:00:00Z", "2024-03-04T10:00:00Z")).await;
    assert_matches!(backwards, Err(AppointmentError::InvalidInterval));

    let empty = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T11:00:00Z", "2024-03-04T11:00:00Z")).await;
    assert_matches!(empty, Err(AppointmentError::InvalidInterval));

    let no_doctor = fx.service.create_appointment(booking(999, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await;
    assert_matches!(no_doctor, Err(AppointmentError::DoctorNotFound));

    let no_patient = fx.service.create_appointment(booking(doctor.id, 999, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await;
    assert_matches!(no_patient, Err(AppointmentError::PatientNotFound));
}

#[tokio::test]
async fn test_walk_in_patient_is_registered_with_booking() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;

    let appointment = fx.service
        .create_appointment(walk_in(doctor.id, None, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z"))
        .await
        .unwrap();

    assert_eq!(appointment.patient.name, "Walk-in");
    assert_eq!(appointment.patient.phone.as_deref(), Some("555-0100"));
    assert_eq!(fx.patients.find_by_id(appointment.patient.id).await.unwrap(), Some(appointment.patient.clone()));
    assert_eq!(appointment.status, AppointmentStatus::Booked);
    assert!(!appointment.urgent);
    assert_eq!(appointment.created_at, utc(NOW));
}

#[tokio::test]
async fn test_rejected_walk_in_is_not_registered() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;

    let result = fx.service
        .create_appointment(walk_in(doctor.id, Some("Cleo"), "2024-03-10T10:00:00Z", "2024-03-10T10:30:00Z"))
        .await;

    assert_matches!(result, Err(AppointmentError::OutsideWorkingDay { .. }));
    assert!(fx.patients.find_many(&PatientSearchQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_caller_supplied_status() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let mut request = booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z");
    request.status = Some("WITH_DOCTOR".to_string());
    let appointment = fx.service.create_appointment(request).await.unwrap();
    assert_eq!(appointment.status, AppointmentStatus::WithDoctor);

    let mut request = booking(doctor.id, patient, "2024-03-04T12:00:00Z", "2024-03-04T13:00:00Z");
    request.status = Some("arrived".to_string());
    assert_matches!(fx.service.create_appointment(request).await, Err(AppointmentError::InvalidStatus(_)));
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let created = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T14:00:00Z", "2024-03-04T14:30:00Z")).await.unwrap();
    let listed = fx.service
        .list_appointments(AppointmentQuery { doctor_id: Some(doctor.id), ..Default::default() })
        .await
        .unwrap();

    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_list_is_ordered_and_filtered() {
    let fx = Fixture::new();
    let hale = fx.monday_doctor().await;
    let ito = fx.doctor("Ito", None).await;
    let ada = fx.patient("Ada").await;
    let ben = fx.patient("Ben").await;

    let late = fx.service.create_appointment(booking(hale.id, ada, "2024-03-04T15:00:00Z", "2024-03-04T15:30:00Z")).await.unwrap();
    let early = fx.service.create_appointment(booking(hale.id, ben, "2024-03-04T09:00:00Z", "2024-03-04T09:30:00Z")).await.unwrap();
    let tuesday = fx.service.create_appointment(booking(hale.id, ada, "2024-03-05T12:00:00Z", "2024-03-05T12:30:00Z")).await.unwrap();
    let other = fx.service.create_appointment(booking(ito.id, ada, "2024-03-04T10:00:00Z", "2024-03-04T10:30:00Z")).await.unwrap();

    let all = fx.service.list_appointments(AppointmentQuery::default()).await.unwrap();
    let ids: Vec<_> = all.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![early.id, other.id, late.id, tuesday.id]);

    let monday_for_ada = fx.service.list_appointments(AppointmentQuery {
        doctor_id: None,
        patient_id: Some(ada),
        date: NaiveDate::from_ymd_opt(2024, 3, 4),
    }).await.unwrap();
    let ids: Vec<_> = monday_for_ada.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![other.id, late.id]);
}

#[tokio::test]
async fn test_date_filter_uses_clinic_day() {
    // UTC-5: 2024-03-05T03:00Z is still Monday evening locally.
    let fx = Fixture::with_calendar(ClinicCalendar::with_offset_minutes(-300));
    let doctor = fx.doctor("Ito", None).await;
    let patient = fx.patient("Ada").await;

    let evening = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-05T03:00:00Z", "2024-03-05T03:30:00Z")).await.unwrap();
    fx.service.create_appointment(booking(doctor.id, patient, "2024-03-05T06:00:00Z", "2024-03-05T06:30:00Z")).await.unwrap();

    let monday = fx.service.list_appointments(AppointmentQuery {
        date: NaiveDate::from_ymd_opt(2024, 3, 4),
        ..Default::default()
    }).await.unwrap();

    assert_eq!(monday.len(), 1);
    assert_eq!(monday[0].id, evening.id);
}

#[tokio::test]
async fn test_reschedule_excludes_itself() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let appointment = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    let moved = fx.service.reschedule_appointment(appointment.id, RescheduleAppointmentRequest {
        start_at: Some(utc("2024-03-04T10:30:00Z")),
        end_at: Some(utc("2024-03-04T11:30:00Z")),
        status: None,
    }).await.unwrap();

    assert_eq!(moved.start_at, utc("2024-03-04T10:30:00Z"));
    assert_eq!(moved.end_at, utc("2024-03-04T11:30:00Z"));
    assert_eq!(moved.created_at, appointment.created_at);
}

#[tokio::test]
async fn test_reschedule_into_another_booking_fails_without_changes() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let first = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    let second = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T13:00:00Z", "2024-03-04T14:00:00Z")).await.unwrap();

    let result = fx.service.reschedule_appointment(second.id, RescheduleAppointmentRequest {
        start_at: Some(utc("2024-03-04T10:45:00Z")),
        end_at: None,
        status: Some("completed".to_string()),
    }).await;

    assert_matches!(result, Err(AppointmentError::TimeSlotConflict { appointment_id, .. }) if appointment_id == first.id);
    assert_eq!(fx.service.get_appointment(second.id).await.unwrap(), second);
}

#[tokio::test]
async fn test_reschedule_keeps_unspecified_bound() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let appointment = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();

    let inverted = fx.service.reschedule_appointment(appointment.id, RescheduleAppointmentRequest {
        start_at: Some(utc("2024-03-04T11:30:00Z")),
        ..Default::default()
    }).await;
    assert_matches!(inverted, Err(AppointmentError::InvalidInterval));

    let extended = fx.service.reschedule_appointment(appointment.id, RescheduleAppointmentRequest {
        end_at: Some(utc("2024-03-04T12:00:00Z")),
        ..Default::default()
    }).await.unwrap();
    assert_eq!(extended.start_at, utc("2024-03-04T10:00:00Z"));
    assert_eq!(extended.end_at, utc("2024-03-04T12:00:00Z"));

    let outside = fx.service.reschedule_appointment(appointment.id, RescheduleAppointmentRequest {
        end_at: Some(utc("2024-03-04T18:00:00Z")),
        ..Default::default()
    }).await;
    assert_matches!(outside, Err(AppointmentError::OutsideWorkingHours { .. }));
}

#[tokio::test]
async fn test_reschedule_status_only() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let appointment = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    let updated = fx.service.reschedule_appointment(appointment.id, RescheduleAppointmentRequest {
        status: Some("with_doctor".to_string()),
        ..Default::default()
    }).await.unwrap();

    assert_eq!(updated.status, AppointmentStatus::WithDoctor);
    assert_eq!(updated.start_at, appointment.start_at);

    let missing = fx.service.reschedule_appointment(404, RescheduleAppointmentRequest::default()).await;
    assert_matches!(missing, Err(AppointmentError::NotFound));
}

#[tokio::test]
async fn test_canceled_and_skipped_free_the_slot() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let canceled = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    let canceled = fx.service.cancel_appointment(canceled.id).await.unwrap();
    assert_eq!(canceled.status, AppointmentStatus::Canceled);

    let skipped = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    fx.service.set_status(skipped.id, AppointmentStatus::Skipped).await.unwrap();

    assert!(fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:15:00Z", "2024-03-04T10:45:00Z")).await.is_ok());
}

#[tokio::test]
async fn test_set_status_is_permissive() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let appointment = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    fx.service.set_status(appointment.id, AppointmentStatus::Completed).await.unwrap();
    let reopened = fx.service.set_status(appointment.id, AppointmentStatus::Booked).await.unwrap();
    assert_eq!(reopened.status, AppointmentStatus::Booked);

    assert_matches!(fx.service.set_status(404, AppointmentStatus::Booked).await, Err(AppointmentError::NotFound));
    assert_matches!(fx.service.cancel_appointment(404).await, Err(AppointmentError::NotFound));
}

#[tokio::test]
async fn test_mark_urgent_is_idempotent() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let appointment = fx.service.create_appointment(booking(doctor.id, patient, "2024-03-04T10:00:00Z", "2024-03-04T11:00:00Z")).await.unwrap();
    let once = fx.service.mark_urgent(appointment.id).await.unwrap();
    let twice = fx.service.mark_urgent(appointment.id).await.unwrap();

    assert!(once.urgent);
    assert_eq!(once, twice);
    assert_eq!(twice.status, AppointmentStatus::Booked);
    assert_matches!(fx.service.mark_urgent(404).await, Err(AppointmentError::NotFound));
}

#[tokio::test]
async fn test_concurrent_bookings_for_one_slot() {
    let fx = Fixture::new();
    let doctor = fx.monday_doctor().await;
    let patient = fx.patient("Ada").await;

    let attempts = (0..8).map(|i| {
        let service = Arc::clone(&fx.service);
        let start = utc("2024-03-04T10:00:00Z") + Duration::minutes(i * 5);
        let request = CreateAppointmentRequest {
            doctor_id: doctor.id,
            patient: PatientRef::Existing { id: patient },
            start_at: start,
            end_at: start + Duration::minutes(30),
            status: None,
        };
        tokio::spawn(async move { service.create_appointment(request).await })
    });

    let results = futures::future::join_all(attempts).await;
    let mut booked: Vec<_> = results.into_iter().filter_map(|r| r.unwrap().ok()).collect();
    booked.sort_by_key(|a| a.start_at);
    for pair in booked.windows(2) {
        assert!(pair[0].end_at <= pair[1].start_at, "overlapping bookings: {:?}", pair);
    }
    assert!(!booked.is_empty());

    let listed = fx.service
        .list_appointments(AppointmentQuery { doctor_id: Some(doctor.id), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(listed.len(), booked.len());
}
