use tracing::warn;

use shared_models::workflow::TransitionTable;

use crate::error::QueueError;
use crate::models::QueueStatus;

pub fn default_transitions() -> TransitionTable<QueueStatus> {
    TransitionTable::new([
        (QueueStatus::Waiting, vec![QueueStatus::WithDoctor, QueueStatus::Skipped]),
        (QueueStatus::WithDoctor, vec![QueueStatus::Completed, QueueStatus::Skipped]),
    ])
}

#[derive(Debug, Clone)]
pub struct QueueWorkflow {
    table: TransitionTable<QueueStatus>,
    enforce: bool,
}

impl QueueWorkflow {
    pub fn new(table: TransitionTable<QueueStatus>, enforce: bool) -> Self {
        Self { table, enforce }
    }

    pub fn enforced() -> Self {
        Self::new(default_transitions(), true)
    }

    pub fn permissive() -> Self {
        Self::new(default_transitions(), false)
    }

    pub fn check(&self, from: QueueStatus, to: QueueStatus) -> Result<(), QueueError> {
        if !self.enforce || self.table.allows(from, to) {
            return Ok(());
        }

        warn!("Rejected queue status change {} -> {}", from, to);
        Err(QueueError::InvalidStatusTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use QueueStatus::*;

    #[test]
    fn waiting_patients_are_called_or_skipped() {
        let workflow = QueueWorkflow::enforced();

        assert!(workflow.check(Waiting, WithDoctor).is_ok());
        assert!(workflow.check(Waiting, Skipped).is_ok());
        assert!(workflow.check(Waiting, Completed).is_err());
        assert!(workflow.check(WithDoctor, Completed).is_ok());
        assert!(workflow.check(Completed, Waiting).is_err());
        assert!(QueueWorkflow::permissive().check(Completed, Waiting).is_ok());
    }
}
