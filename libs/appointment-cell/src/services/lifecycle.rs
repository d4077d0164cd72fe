use tracing::warn;

use shared_models::workflow::TransitionTable;

use crate::models::{AppointmentError, AppointmentStatus};

/// Desk workflow for appointments: a booking is seen, skipped or canceled,
/// and a consultation in progress can only complete.
pub fn default_transitions() -> TransitionTable<AppointmentStatus> {
    TransitionTable::new([
        (
            AppointmentStatus::Booked,
            vec![AppointmentStatus::WithDoctor, AppointmentStatus::Skipped, AppointmentStatus::Canceled],
        ),
        (AppointmentStatus::WithDoctor, vec![AppointmentStatus::Completed]),
    ])
}

/// Transition gate applied by the HTTP layer. When disabled every move is
/// accepted, matching the core services.
#[derive(Debug, Clone)]
pub struct AppointmentWorkflow {
    table: TransitionTable<AppointmentStatus>,
    enforce: bool,
}

impl AppointmentWorkflow {
    pub fn new(table: TransitionTable<AppointmentStatus>, enforce: bool) -> Self {
        Self { table, enforce }
    }

    pub fn enforced() -> Self {
        Self::new(default_transitions(), true)
    }

    pub fn permissive() -> Self {
        Self::new(default_transitions(), false)
    }

    pub fn next_statuses(&self, from: AppointmentStatus) -> &[AppointmentStatus] {
        self.table.next(from)
    }

    pub fn check(&self, from: AppointmentStatus, to: AppointmentStatus) -> Result<(), AppointmentError> {
        if !self.enforce || self.table.allows(from, to) {
            return Ok(());
        }

        warn!("Rejected appointment status change {} -> {}", from, to);
        Err(AppointmentError::InvalidStatusTransition { from, to })
    }
}
