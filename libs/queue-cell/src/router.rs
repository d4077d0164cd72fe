use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::{self, QueueState};
use crate::services::{QueueSequencer, QueueWorkflow};

pub fn create_queue_router(sequencer: Arc<QueueSequencer>, workflow: QueueWorkflow) -> Router {
    let state = QueueState {
        sequencer,
        workflow: Arc::new(workflow),
    };

    Router::new()
        .route("/", get(handlers::list_queue).post(handlers::enqueue))
        .route("/{entry_id}/status", patch(handlers::update_queue_status))
        .route("/{entry_id}/priority", patch(handlers::mark_queue_urgent))
        .with_state(state)
}
