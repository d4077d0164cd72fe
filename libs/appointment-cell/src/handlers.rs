use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    AppointmentError, AppointmentQuery, AppointmentStatus, CreateAppointmentRequest,
    RescheduleAppointmentRequest, UpdateStatusRequest,
};
use crate::services::{AppointmentBookingService, AppointmentWorkflow};

#[derive(Clone)]
pub struct AppointmentState {
    pub service: Arc<AppointmentBookingService>,
    pub workflow: Arc<AppointmentWorkflow>,
}

fn to_app_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound
        | AppointmentError::DoctorNotFound
        | AppointmentError::PatientNotFound => AppError::NotFound(e.to_string()),
        AppointmentError::InvalidInterval
        | AppointmentError::OutsideWorkingDay { .. }
        | AppointmentError::OutsideWorkingHours { .. }
        | AppointmentError::WorkingHoursMalformed { .. }
        | AppointmentError::InvalidStatus(_) => AppError::BadRequest(e.to_string()),
        AppointmentError::TimeSlotConflict { .. }
        | AppointmentError::InvalidStatusTransition { .. } => AppError::Conflict(e.to_string()),
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

/// Applies the workflow table against the stored status before a change.
async fn guard_transition(
    state: &AppointmentState,
    appointment_id: i64,
    to: AppointmentStatus,
) -> Result<(), AppointmentError> {
    let current = state.service.get_appointment(appointment_id).await?;
    state.workflow.check(current.status, to)
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentState>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.service.list_appointments(query).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "total": appointments.len(),
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppointmentState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = state.service.create_appointment(request).await.map_err(to_app_error)?;
    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.service.get_appointment(appointment_id).await.map_err(to_app_error)?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(raw) = request.status.as_deref() {
        let to = raw.parse::<AppointmentStatus>().map_err(to_app_error)?;
        guard_transition(&state, appointment_id, to).await.map_err(to_app_error)?;
    }

    let appointment = state.service
        .reschedule_appointment(appointment_id, request)
        .await
        .map_err(to_app_error)?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    guard_transition(&state, appointment_id, AppointmentStatus::Canceled).await.map_err(to_app_error)?;

    let appointment = state.service.cancel_appointment(appointment_id).await.map_err(to_app_error)?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let to = request.status.parse::<AppointmentStatus>().map_err(to_app_error)?;
    guard_transition(&state, appointment_id, to).await.map_err(to_app_error)?;

    let appointment = state.service.set_status(appointment_id, to).await.map_err(to_app_error)?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn mark_appointment_urgent(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.service.mark_urgent(appointment_id).await.map_err(to_app_error)?;
    Ok(Json(json!(appointment)))
}
