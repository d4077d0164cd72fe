use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::error::QueueError;
use crate::models::{EnqueueRequest, QueueStatus, UpdateQueueStatusRequest};
use crate::services::{QueueSequencer, QueueWorkflow};

#[derive(Clone)]
pub struct QueueState {
    pub sequencer: Arc<QueueSequencer>,
    pub workflow: Arc<QueueWorkflow>,
}

fn to_app_error(e: QueueError) -> AppError {
    match e {
        QueueError::NotFound => AppError::NotFound(e.to_string()),
        QueueError::InvalidStatus(_) => AppError::BadRequest(e.to_string()),
        QueueError::ValidationError(msg) => AppError::ValidationError(msg),
        QueueError::InvalidStatusTransition { .. } => AppError::Conflict(e.to_string()),
        QueueError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_queue(
    State(state): State<QueueState>,
) -> Result<Json<Value>, AppError> {
    let entries = state.sequencer.list_queue().await.map_err(to_app_error)?;

    Ok(Json(json!({
        "total": entries.len(),
        "entries": entries
    })))
}

#[axum::debug_handler]
pub async fn enqueue(
    State(state): State<QueueState>,
    Json(request): Json<EnqueueRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entry = state.sequencer.enqueue(request).await.map_err(to_app_error)?;
    Ok((StatusCode::CREATED, Json(json!(entry))))
}

#[axum::debug_handler]
pub async fn update_queue_status(
    State(state): State<QueueState>,
    Path(entry_id): Path<i64>,
    Json(request): Json<UpdateQueueStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let current = state.sequencer.get_entry(entry_id).await.map_err(to_app_error)?;
    let to = request.status.parse::<QueueStatus>().map_err(to_app_error)?;
    state.workflow.check(current.status, to).map_err(to_app_error)?;

    let entry = state.sequencer
        .update_status(entry_id, &request.status)
        .await
        .map_err(to_app_error)?;
    Ok(Json(json!(entry)))
}

#[axum::debug_handler]
pub async fn mark_queue_urgent(
    State(state): State<QueueState>,
    Path(entry_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let entry = state.sequencer.mark_urgent(entry_id).await.map_err(to_app_error)?;
    Ok(Json(json!(entry)))
}
