use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::{self, AppointmentState};
use crate::services::{AppointmentBookingService, AppointmentWorkflow};

pub fn appointment_routes(service: Arc<AppointmentBookingService>, workflow: AppointmentWorkflow) -> Router {
    let state = AppointmentState {
        service,
        workflow: Arc::new(workflow),
    };

    Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::create_appointment))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::reschedule_appointment)
                .delete(handlers::cancel_appointment),
        )
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status))
        .route("/{appointment_id}/priority", patch(handlers::mark_appointment_urgent))
        .with_state(state)
}
