//! Previous-owner strategy: stick with whoever handled the prior step.

use crate::selector::AssigneeSelector;
use ::async_trait::async_trait;
use rotor_core::{
    AssigneeSelectionResult, AssignmentContext, AssignmentStrategy, RotorResult, SelectionError,
};
use rotor_storage::AssignmentStore;
use std::sync::Arc;

/// Returns the assignee of the most recent completed task for the
/// context's correlation and activity.
///
/// No correlation id or no completion history is a `NoEligibleAssignee`
/// failure; first-time activities fall through to the next strategy.
pub struct PreviousOwnerSelector {
    store: Arc<dyn AssignmentStore>,
}

impl PreviousOwnerSelector {
    pub fn new(store: Arc<dyn AssignmentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AssigneeSelector for PreviousOwnerSelector {
    fn strategy(&self) -> AssignmentStrategy {
        AssignmentStrategy::PreviousOwner
    }

    async fn select(&self, context: &AssignmentContext) -> RotorResult<AssigneeSelectionResult> {
        let correlation_id = context.correlation_id.ok_or_else(|| {
            SelectionError::no_eligible(
                self.strategy(),
                context.activity_name.clone(),
                "context carries no correlation id",
            )
        })?;

        let history = self
            .store
            .completed_history(correlation_id, &context.activity_name)
            .await?;

        let previous = history.last().ok_or_else(|| {
            SelectionError::no_eligible(
                self.strategy(),
                context.activity_name.clone(),
                "no completed-task history for this correlation",
            )
        })?;

        Ok(AssigneeSelectionResult::individual(
            previous.assignee.clone(),
            self.strategy(),
            format!("completed {} on {}", previous.task_name, previous.completed_at),
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
