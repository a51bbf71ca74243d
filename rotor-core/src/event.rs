//! Task lifecycle event types.
//!
//! Every state mutation the orchestration performs is observable through
//! exactly one published event. Delivery is at-least-once; downstream
//! consumers are expected to be idempotent.

use crate::{AssigneeType, AssignmentStrategy, CorrelationId, EntityId, Timestamp, UserCode};
use serde::{Deserialize, Serialize};

/// Lifecycle events emitted by the assignment orchestration.
///
/// Plain data records; the engine never calls back into workflow
/// advancement logic directly, it only publishes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TaskEvent {
    /// A workflow instance was started for a request.
    WorkflowStarted {
        correlation_id: CorrelationId,
        request_id: EntityId,
        started_at: Timestamp,
    },

    /// A task was assigned and recorded as pending.
    AssignmentCreated {
        correlation_id: CorrelationId,
        task_name: String,
        activity_name: String,
        assignee: UserCode,
        assignee_type: AssigneeType,
        strategy: AssignmentStrategy,
        assigned_at: Timestamp,
    },

    /// A pending task was resolved.
    TaskCompleted {
        correlation_id: CorrelationId,
        task_name: String,
        assignee: UserCode,
        action_taken: String,
        completed_at: Timestamp,
    },
}

impl TaskEvent {
    /// Get the event type as a string for logging/debugging.
    pub fn event_type(&self) -> &'static str {
        match self {
            TaskEvent::WorkflowStarted { .. } => "WorkflowStarted",
            TaskEvent::AssignmentCreated { .. } => "AssignmentCreated",
            TaskEvent::TaskCompleted { .. } => "TaskCompleted",
        }
    }

    /// The workflow correlation this event belongs to.
    pub fn correlation_id(&self) -> CorrelationId {
        match self {
            TaskEvent::WorkflowStarted { correlation_id, .. }
            | TaskEvent::AssignmentCreated { correlation_id, .. }
            | TaskEvent::TaskCompleted { correlation_id, .. } => *correlation_id,
        }
    }
}
