use axum::{routing::get, Router};

use appointment_cell::appointment_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::create_patient_router;
use queue_cell::create_queue_router;

use crate::state::AppServices;

pub fn create_router(services: AppServices) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic front-desk API is running!" }))
        .nest("/doctors", doctor_routes(services.doctors))
        .nest("/patients", create_patient_router(services.patients))
        .nest(
            "/appointments",
            appointment_routes(services.appointments, services.appointment_workflow),
        )
        .nest("/queue", create_queue_router(services.queue, services.queue_workflow))
}
