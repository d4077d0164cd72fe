use std::sync::Arc;

use tracing::{info, warn};

use appointment_cell::{
    AppointmentBookingService, AppointmentDependents, AppointmentStore, AppointmentWorkflow,
    InMemoryAppointmentStore, SupabaseAppointmentStore,
};
use doctor_cell::{DoctorLocks, DoctorService, DoctorStore, InMemoryDoctorStore, SupabaseDoctorStore};
use patient_cell::{InMemoryPatientStore, PatientService, PatientStore, SupabasePatientStore};
use queue_cell::{InMemoryQueueStore, QueueSequencer, QueueStore, QueueWorkflow, SupabaseQueueStore};
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::{ClinicCalendar, Clock, SystemClock};

/// Every cell's service, wired over one set of stores.
pub struct AppServices {
    pub doctors: Arc<DoctorService>,
    pub patients: Arc<PatientService>,
    pub appointments: Arc<AppointmentBookingService>,
    pub appointment_workflow: AppointmentWorkflow,
    pub queue: Arc<QueueSequencer>,
    pub queue_workflow: QueueWorkflow,
}

struct Stores {
    doctors: Arc<dyn DoctorStore>,
    patients: Arc<dyn PatientStore>,
    appointments: Arc<dyn AppointmentStore>,
    queue: Arc<dyn QueueStore>,
}

impl Stores {
    fn hosted(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        Self {
            doctors: Arc::new(SupabaseDoctorStore::new(Arc::clone(&supabase))),
            patients: Arc::new(SupabasePatientStore::new(Arc::clone(&supabase))),
            appointments: Arc::new(SupabaseAppointmentStore::new(Arc::clone(&supabase))),
            queue: Arc::new(SupabaseQueueStore::new(supabase)),
        }
    }

    fn in_memory() -> Self {
        Self {
            doctors: Arc::new(InMemoryDoctorStore::new()),
            patients: Arc::new(InMemoryPatientStore::new()),
            appointments: Arc::new(InMemoryAppointmentStore::new()),
            queue: Arc::new(InMemoryQueueStore::new()),
        }
    }
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> Self {
        let stores = if config.is_configured() {
            info!("Using Supabase stores at {}", config.supabase_url);
            Stores::hosted(config)
        } else {
            warn!("Supabase is not configured, keeping all records in memory");
            Stores::in_memory()
        };

        Self::build(stores, Arc::new(SystemClock), ClinicCalendar::from_config(config), config.enforce_status_transitions)
    }

    #[cfg(test)]
    pub fn in_memory(clock: Arc<dyn Clock>, enforce_status_transitions: bool) -> Self {
        Self::build(Stores::in_memory(), clock, ClinicCalendar::utc(), enforce_status_transitions)
    }

    fn build(stores: Stores, clock: Arc<dyn Clock>, calendar: ClinicCalendar, enforce: bool) -> Self {
        let dependents = Arc::new(AppointmentDependents::new(Arc::clone(&stores.appointments)));
        let locks = Arc::new(DoctorLocks::new());

        let appointments = AppointmentBookingService::new(
            Arc::clone(&stores.appointments),
            Arc::clone(&stores.doctors),
            Arc::clone(&stores.patients),
            Arc::clone(&clock),
            calendar,
        ).with_locks(Arc::clone(&locks));

        let (appointment_workflow, queue_workflow) = if enforce {
            (AppointmentWorkflow::enforced(), QueueWorkflow::enforced())
        } else {
            (AppointmentWorkflow::permissive(), QueueWorkflow::permissive())
        };

        Self {
            doctors: Arc::new(DoctorService::new(stores.doctors, dependents).with_locks(locks)),
            patients: Arc::new(PatientService::new(stores.patients)),
            appointments: Arc::new(appointments),
            appointment_workflow,
            queue: Arc::new(QueueSequencer::new(stores.queue, clock, calendar)),
            queue_workflow,
        }
    }
}
