use thiserror::Error;

use crate::models::QueueStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("Queue entry not found")]
    NotFound,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Cannot change queue status from {from} to {to}")]
    InvalidStatusTransition { from: QueueStatus, to: QueueStatus },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
