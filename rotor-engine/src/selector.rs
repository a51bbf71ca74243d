//! Assignee selector contract.

use ::async_trait::async_trait;
use rotor_core::{AssigneeSelectionResult, AssignmentContext, AssignmentStrategy, RotorResult};

/// One assignment policy.
///
/// A selector consumes an `AssignmentContext` and produces exactly one
/// assignee, or fails with `SelectionError::NoEligibleAssignee` when its
/// policy-specific condition is unsatisfiable (empty pool, missing
/// property, no history). Those failures are normal fallback-path
/// outcomes; the orchestration moves on to the next configured strategy.
#[async_trait]
pub trait AssigneeSelector: Send + Sync {
    /// The strategy this selector implements.
    fn strategy(&self) -> AssignmentStrategy;

    /// Select an assignee for the given context.
    async fn select(&self, context: &AssignmentContext) -> RotorResult<AssigneeSelectionResult>;
}
