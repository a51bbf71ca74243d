//! In-memory store for tests and single-process embedders.

use crate::store::AssignmentStore;
use ::async_trait::async_trait;
use rotor_core::{
    CompletedTask, CorrelationId, PendingTask, RotorResult, RoundRobinCursor, StoreError,
    UserCode, WorkflowCorrelation,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type CursorKey = (String, String);
type TaskKey = (CorrelationId, String);

/// In-memory `AssignmentStore`.
///
/// Every table sits behind its own `RwLock`; cursor writes take the write
/// lock for the whole compare-and-swap, which gives the same atomicity a
/// database row-version check would.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    cursors: Arc<RwLock<HashMap<CursorKey, RoundRobinCursor>>>,
    pending: Arc<RwLock<HashMap<TaskKey, PendingTask>>>,
    completed: Arc<RwLock<Vec<CompletedTask>>>,
    correlations: Arc<RwLock<HashMap<CorrelationId, WorkflowCorrelation>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All pending tasks, for test assertions.
    pub fn pending_snapshot(&self) -> Vec<PendingTask> {
        self.pending
            .read()
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }

    /// All completed tasks in completion order, for test assertions.
    pub fn completed_snapshot(&self) -> Vec<CompletedTask> {
        self.completed
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn round_robin_get(
        &self,
        activity_name: &str,
        group_key: &str,
    ) -> RotorResult<Option<RoundRobinCursor>> {
        let cursors = self.cursors.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(cursors
            .get(&(activity_name.to_string(), group_key.to_string()))
            .cloned())
    }

    async fn round_robin_put(
        &self,
        cursor: &RoundRobinCursor,
        expected_version: Option<u64>,
    ) -> RotorResult<()> {
        let key = (cursor.activity_name.clone(), cursor.group_key.clone());
        let mut cursors = self.cursors.write().map_err(|_| StoreError::LockPoisoned)?;

        let conflict = || StoreError::VersionConflict {
            activity_name: cursor.activity_name.clone(),
            group_key: cursor.group_key.clone(),
        };

        match (cursors.get(&key), expected_version) {
            (None, None) => {
                let mut stored = cursor.clone();
                stored.version = 1;
                cursors.insert(key, stored);
                Ok(())
            }
            (Some(existing), Some(expected)) if existing.version == expected => {
                let mut stored = cursor.clone();
                stored.version = expected + 1;
                cursors.insert(key, stored);
                Ok(())
            }
            _ => Err(conflict().into()),
        }
    }

    async fn pending_insert(&self, task: &PendingTask) -> RotorResult<()> {
        let key = (task.correlation_id, task.task_name.clone());
        let mut pending = self.pending.write().map_err(|_| StoreError::LockPoisoned)?;
        if pending.contains_key(&key) {
            return Err(StoreError::InsertFailed {
                kind: "PendingTask".to_string(),
                reason: format!(
                    "pending task already exists for ({}, {})",
                    task.correlation_id, task.task_name
                ),
            }
            .into());
        }
        pending.insert(key, task.clone());
        Ok(())
    }

    async fn pending_get(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
    ) -> RotorResult<Option<PendingTask>> {
        let pending = self.pending.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(pending
            .get(&(correlation_id, task_name.to_string()))
            .cloned())
    }

    async fn pending_delete(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
    ) -> RotorResult<()> {
        let mut pending = self.pending.write().map_err(|_| StoreError::LockPoisoned)?;
        pending
            .remove(&(correlation_id, task_name.to_string()))
            .map(|_| ())
            .ok_or_else(|| {
                StoreError::NotFound {
                    kind: "PendingTask".to_string(),
                    key: format!("({}, {})", correlation_id, task_name),
                }
                .into()
            })
    }

    async fn count_open_for_user(&self, user_code: &UserCode) -> RotorResult<usize> {
        let pending = self.pending.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(pending
            .values()
            .filter(|task| &task.assignee == user_code)
            .count())
    }

    async fn completed_insert(&self, task: &CompletedTask) -> RotorResult<()> {
        let mut completed = self.completed.write().map_err(|_| StoreError::LockPoisoned)?;
        let duplicate = completed.iter().any(|existing| {
            existing.correlation_id == task.correlation_id
                && existing.task_name == task.task_name
        });
        if duplicate {
            return Err(StoreError::InsertFailed {
                kind: "CompletedTask".to_string(),
                reason: format!(
                    "task ({}, {}) was already completed",
                    task.correlation_id, task.task_name
                ),
            }
            .into());
        }
        completed.push(task.clone());
        Ok(())
    }

    async fn completed_get(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
    ) -> RotorResult<Option<CompletedTask>> {
        let completed = self.completed.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(completed
            .iter()
            .find(|task| task.correlation_id == correlation_id && task.task_name == task_name)
            .cloned())
    }

    async fn completed_history(
        &self,
        correlation_id: CorrelationId,
        activity_name: &str,
    ) -> RotorResult<Vec<CompletedTask>> {
        let completed = self.completed.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(completed
            .iter()
            .filter(|task| {
                task.correlation_id == correlation_id && task.activity_name == activity_name
            })
            .cloned()
            .collect())
    }

    async fn correlation_insert(&self, correlation: &WorkflowCorrelation) -> RotorResult<()> {
        let mut correlations = self
            .correlations
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        correlations.insert(correlation.correlation_id, correlation.clone());
        Ok(())
    }

    async fn correlation_get(
        &self,
        correlation_id: CorrelationId,
    ) -> RotorResult<Option<WorkflowCorrelation>> {
        let correlations = self
            .correlations
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(correlations.get(&correlation_id).cloned())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rotor_core::{AssigneeType, AssignmentStrategy, RotorError};
    use uuid::Uuid;

    fn pending_task(correlation_id: CorrelationId, task_name: &str, assignee: &str) -> PendingTask {
        PendingTask {
            correlation_id,
            task_name: task_name.to_string(),
            activity_name: task_name.to_string(),
            assignee: assignee.to_string(),
            assignee_type: AssigneeType::Individual,
            strategy: AssignmentStrategy::RoundRobin,
            assigned_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_cursor_create_and_update() {
        let store = MemoryStore::new();
        let cursor = RoundRobinCursor::new("Review", "appraisers", 0);

        store.round_robin_put(&cursor, None).await.unwrap();
        let stored = store
            .round_robin_get("Review", "appraisers")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.last_index, 0);
        assert_eq!(stored.version, 1);

        let mut next = stored.clone();
        next.advance_to(1);
        store.round_robin_put(&next, Some(1)).await.unwrap();
        let stored = store
            .round_robin_get("Review", "appraisers")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.last_index, 1);
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_cursor_stale_version_conflicts() {
        let store = MemoryStore::new();
        let cursor = RoundRobinCursor::new("Review", "appraisers", 0);
        store.round_robin_put(&cursor, None).await.unwrap();

        // A second writer that read version 1 wins...
        let mut winner = cursor.clone();
        winner.advance_to(1);
        store.round_robin_put(&winner, Some(1)).await.unwrap();

        // ...and the loser's stale write is rejected.
        let mut loser = cursor.clone();
        loser.advance_to(1);
        let err = store.round_robin_put(&loser, Some(1)).await.unwrap_err();
        assert!(matches!(
            err,
            RotorError::Store(StoreError::VersionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_cursor_double_create_conflicts() {
        let store = MemoryStore::new();
        let cursor = RoundRobinCursor::new("Review", "appraisers", 0);
        store.round_robin_put(&cursor, None).await.unwrap();
        assert!(store.round_robin_put(&cursor, None).await.is_err());
    }

    #[tokio::test]
    async fn test_pending_uniqueness_per_correlation_task() {
        let store = MemoryStore::new();
        let correlation_id = Uuid::now_v7();
        let task = pending_task(correlation_id, "Review", "u-001");

        store.pending_insert(&task).await.unwrap();
        let err = store.pending_insert(&task).await.unwrap_err();
        assert!(matches!(
            err,
            RotorError::Store(StoreError::InsertFailed { .. })
        ));

        // A different task name under the same correlation is fine.
        let other = pending_task(correlation_id, "Quotation", "u-002");
        store.pending_insert(&other).await.unwrap();
    }

    #[tokio::test]
    async fn test_count_open_for_user() {
        let store = MemoryStore::new();
        store
            .pending_insert(&pending_task(Uuid::now_v7(), "Review", "u-001"))
            .await
            .unwrap();
        store
            .pending_insert(&pending_task(Uuid::now_v7(), "Review", "u-001"))
            .await
            .unwrap();
        store
            .pending_insert(&pending_task(Uuid::now_v7(), "Review", "u-002"))
            .await
            .unwrap();

        assert_eq!(
            store.count_open_for_user(&"u-001".to_string()).await.unwrap(),
            2
        );
        assert_eq!(
            store.count_open_for_user(&"u-002".to_string()).await.unwrap(),
            1
        );
        assert_eq!(
            store.count_open_for_user(&"u-003".to_string()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_pending_delete_missing_fails() {
        let store = MemoryStore::new();
        let err = store
            .pending_delete(Uuid::now_v7(), "Review")
            .await
            .unwrap_err();
        assert!(matches!(err, RotorError::Store(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_completed_insert_rejects_duplicate() {
        let store = MemoryStore::new();
        let completed = pending_task(Uuid::now_v7(), "Review", "u-001").complete("Approved");

        store.completed_insert(&completed).await.unwrap();
        assert!(store.completed_insert(&completed).await.is_err());
        assert_eq!(store.completed_snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_completed_get_by_identity() {
        let store = MemoryStore::new();
        let completed = pending_task(Uuid::now_v7(), "Review", "u-001").complete("Approved");
        store.completed_insert(&completed).await.unwrap();

        let fetched = store
            .completed_get(completed.correlation_id, "Review")
            .await
            .unwrap();
        assert_eq!(fetched, Some(completed.clone()));
        assert_eq!(
            store
                .completed_get(completed.correlation_id, "Quotation")
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_completed_history_filters_and_orders() {
        let store = MemoryStore::new();
        let correlation_id = Uuid::now_v7();

        let first = pending_task(correlation_id, "Review", "u-001").complete("Returned");
        let second = pending_task(correlation_id, "Quotation", "u-002").complete("Approved");
        store.completed_insert(&first).await.unwrap();
        store.completed_insert(&second).await.unwrap();

        // Unrelated correlation noise.
        store
            .completed_insert(&pending_task(Uuid::now_v7(), "Review", "u-009").complete("Approved"))
            .await
            .unwrap();

        let history = store
            .completed_history(correlation_id, "Review")
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].assignee, "u-001");
    }

    #[tokio::test]
    async fn test_correlation_roundtrip() {
        let store = MemoryStore::new();
        let correlation = WorkflowCorrelation::new(Uuid::now_v7());
        store.correlation_insert(&correlation).await.unwrap();
        let fetched = store
            .correlation_get(correlation.correlation_id)
            .await
            .unwrap();
        assert_eq!(fetched, Some(correlation));
    }
}
