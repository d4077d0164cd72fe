use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    CreateDoctorRequest, DoctorError, DoctorSearchFilters, UpdateAvailabilityRequest,
    UpdateDoctorRequest,
};
use crate::services::DoctorService;

fn to_app_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::NotFound => AppError::NotFound(e.to_string()),
        DoctorError::SpecializationRequired
        | DoctorError::WorkingHoursMalformed(_)
        | DoctorError::ValidationError(_) => AppError::BadRequest(e.to_string()),
        DoctorError::HasAppointments => AppError::Conflict(e.to_string()),
        DoctorError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(service): State<Arc<DoctorService>>,
    Query(filters): Query<DoctorSearchFilters>,
) -> Result<Json<Value>, AppError> {
    let doctors = service.list_doctors(filters).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "total": doctors.len(),
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(service): State<Arc<DoctorService>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor = service.create_doctor(request).await.map_err(to_app_error)?;
    Ok((StatusCode::CREATED, Json(json!(doctor))))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(service): State<Arc<DoctorService>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor = service.get_doctor(doctor_id).await.map_err(to_app_error)?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(service): State<Arc<DoctorService>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = service.update_doctor(doctor_id, request).await.map_err(to_app_error)?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(service): State<Arc<DoctorService>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = service.update_availability(doctor_id, request).await.map_err(to_app_error)?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(service): State<Arc<DoctorService>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    service.delete_doctor(doctor_id).await.map_err(to_app_error)?;
    Ok(Json(json!({ "success": true })))
}
