//! Async storage trait for assignment state.
//!
//! This is the engine's whole persistence boundary: a record store with
//! optimistic concurrency on the round-robin cursor. Implementations back
//! it with whatever the host application uses; `MemoryStore` backs tests
//! and embedders.

use ::async_trait::async_trait;
use rotor_core::{
    CompletedTask, CorrelationId, PendingTask, RotorResult, RoundRobinCursor, UserCode,
    WorkflowCorrelation,
};

/// Async storage trait for assignment bookkeeping.
///
/// All writes are all-or-nothing: a cancelled caller never observes a
/// half-applied cursor or task record.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    // ========================================================================
    // ROUND-ROBIN CURSOR OPERATIONS
    // ========================================================================

    /// Get the round-robin cursor for an `(activity, group)` key.
    async fn round_robin_get(
        &self,
        activity_name: &str,
        group_key: &str,
    ) -> RotorResult<Option<RoundRobinCursor>>;

    /// Write a round-robin cursor under an optimistic version check.
    ///
    /// `expected_version` is `None` to create the cursor (fails when one
    /// already exists) or `Some(v)` to update a cursor last read at version
    /// `v`. A mismatch fails with `StoreError::VersionConflict`; the stored
    /// version is bumped on success.
    async fn round_robin_put(
        &self,
        cursor: &RoundRobinCursor,
        expected_version: Option<u64>,
    ) -> RotorResult<()>;

    // ========================================================================
    // PENDING TASK OPERATIONS
    // ========================================================================

    /// Insert a pending task.
    ///
    /// Fails when a pending task already exists for the same
    /// `(correlation_id, task_name)` - at most one may exist at a time.
    async fn pending_insert(&self, task: &PendingTask) -> RotorResult<()>;

    /// Get a pending task by its correlation and task name.
    async fn pending_get(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
    ) -> RotorResult<Option<PendingTask>>;

    /// Delete a pending task. Fails when no matching record exists.
    async fn pending_delete(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
    ) -> RotorResult<()>;

    /// Count open pending tasks currently assigned to a user.
    async fn count_open_for_user(&self, user_code: &UserCode) -> RotorResult<usize>;

    // ========================================================================
    // COMPLETED TASK OPERATIONS
    // ========================================================================

    /// Insert a completed task record.
    ///
    /// Fails when the same `(correlation_id, task_name)` was already
    /// completed - completions are recorded exactly once.
    async fn completed_insert(&self, task: &CompletedTask) -> RotorResult<()>;

    /// Get a completed task by its correlation and task name.
    async fn completed_get(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
    ) -> RotorResult<Option<CompletedTask>>;

    /// Completion history for a correlation and activity, oldest first.
    async fn completed_history(
        &self,
        correlation_id: CorrelationId,
        activity_name: &str,
    ) -> RotorResult<Vec<CompletedTask>>;

    // ========================================================================
    // WORKFLOW CORRELATION OPERATIONS
    // ========================================================================

    /// Insert a new workflow correlation.
    async fn correlation_insert(&self, correlation: &WorkflowCorrelation) -> RotorResult<()>;

    /// Get a workflow correlation by id.
    async fn correlation_get(
        &self,
        correlation_id: CorrelationId,
    ) -> RotorResult<Option<WorkflowCorrelation>>;
}
