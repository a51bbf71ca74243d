//! Workflow task bookkeeping entities.
//!
//! A task's assignment lifecycle is `Unassigned -> Pending -> Completed`.
//! `PendingTask::complete` consumes the pending record and yields the
//! completed one, so a task record is moved between the two tables rather
//! than duplicated; the compiler refuses any code path that keeps using a
//! pending record after completing it.

use crate::{
    new_correlation_id, AssigneeType, AssignmentStrategy, CorrelationId, EntityId, Timestamp,
    UserCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ============================================================================
// WORKFLOW CORRELATION
// ============================================================================

/// One workflow instance, created by `start_workflow`.
///
/// Ties together the pending/completed task records and lifecycle events of
/// a single appraisal request's workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WorkflowCorrelation {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub correlation_id: CorrelationId,
    /// The appraisal request this workflow runs for
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub request_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub started_at: Timestamp,
}

impl WorkflowCorrelation {
    /// Create a new correlation for a request, stamped now.
    pub fn new(request_id: EntityId) -> Self {
        Self {
            correlation_id: new_correlation_id(),
            request_id,
            started_at: Utc::now(),
        }
    }
}

// ============================================================================
// PENDING TASK
// ============================================================================

/// A task that has been assigned and awaits completion.
///
/// At most one pending task exists per `(correlation_id, task_name)`; the
/// store enforces the invariant on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PendingTask {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub correlation_id: CorrelationId,
    pub task_name: String,
    /// Workflow step the assignment was made for
    pub activity_name: String,
    /// Current assignee
    pub assignee: UserCode,
    pub assignee_type: AssigneeType,
    /// Strategy that produced the assignment
    pub strategy: AssignmentStrategy,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub assigned_at: Timestamp,
}

impl PendingTask {
    /// Resolve this task, consuming the pending record.
    ///
    /// The returned `CompletedTask` carries the same correlation/task
    /// identity; persisting it and deleting the pending row is the store
    /// side of the move.
    pub fn complete(self, action_taken: impl Into<String>) -> CompletedTask {
        CompletedTask {
            correlation_id: self.correlation_id,
            task_name: self.task_name,
            activity_name: self.activity_name,
            assignee: self.assignee,
            action_taken: action_taken.into(),
            assigned_at: self.assigned_at,
            completed_at: Utc::now(),
        }
    }
}

// ============================================================================
// COMPLETED TASK
// ============================================================================

/// A resolved task, kept as workflow history.
///
/// The PreviousOwner strategy reads this history to re-assign follow-up
/// tasks to whoever handled the prior step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CompletedTask {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub correlation_id: CorrelationId,
    pub task_name: String,
    pub activity_name: String,
    /// Who resolved the task
    pub assignee: UserCode,
    /// Action the assignee took (workflow-defined, e.g. "Approved")
    pub action_taken: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub assigned_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub completed_at: Timestamp,
}

// =============================================================================
// TESTS
// =============================================================================
