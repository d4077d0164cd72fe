use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientError, PatientSearchQuery};
use crate::services::PatientService;

fn to_app_error(e: PatientError) -> AppError {
    match e {
        PatientError::NotFound => AppError::NotFound(e.to_string()),
        PatientError::ValidationError(msg) => AppError::ValidationError(msg),
        PatientError::DatabaseError(msg) => AppError::Database(msg),
    }
}

pub async fn create_patient(
    State(service): State<Arc<PatientService>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient = service.create_patient(request).await.map_err(to_app_error)?;
    Ok((StatusCode::CREATED, Json(json!(patient))))
}

pub async fn get_patient(
    State(service): State<Arc<PatientService>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let patient = service.get_patient(id).await.map_err(to_app_error)?;
    Ok(Json(json!(patient)))
}

pub async fn search_patients(
    State(service): State<Arc<PatientService>>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let patients = service.list_patients(query).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "total": patients.len(),
        "patients": patients
    })))
}
