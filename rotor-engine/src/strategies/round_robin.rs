//! Round-robin strategy: fair rotation through a persisted cursor.

use crate::groups::GroupDirectory;
use crate::selector::AssigneeSelector;
use ::async_trait::async_trait;
use rotor_core::{
    AssigneeSelectionResult, AssignmentContext, AssignmentError, AssignmentStrategy, RotorError,
    RotorResult, RoundRobinCursor, SelectionError, StoreError, UserCode,
    DEFAULT_MAX_CONFLICT_RETRIES,
};
use rotor_storage::AssignmentStore;
use std::sync::Arc;

/// Rotates through the members of the first non-empty group in the
/// context, keyed on `(activity_name, group)`.
///
/// The cursor write is guarded by an optimistic version check; concurrent
/// assignments on the same key race on it, the loser re-reads and retries
/// up to `max_conflict_retries` before surfacing the transient
/// `AssignmentError::Conflict`.
pub struct RoundRobinSelector {
    directory: Arc<dyn GroupDirectory>,
    store: Arc<dyn AssignmentStore>,
    max_conflict_retries: u32,
}

impl RoundRobinSelector {
    pub fn new(directory: Arc<dyn GroupDirectory>, store: Arc<dyn AssignmentStore>) -> Self {
        Self {
            directory,
            store,
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
        }
    }

    /// Override the optimistic-retry bound.
    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries.max(1);
        self
    }

    /// The first group in the context that resolves to a non-empty
    /// membership, together with its members in directory order.
    async fn first_matching_group(
        &self,
        context: &AssignmentContext,
    ) -> RotorResult<(String, Vec<UserCode>)> {
        for group in &context.user_groups {
            let members = self.directory.members(group).await?;
            if !members.is_empty() {
                return Ok((group.clone(), members));
            }
        }
        Err(SelectionError::no_eligible(
            self.strategy(),
            context.activity_name.clone(),
            "no configured group has members",
        )
        .into())
    }

    /// One read-compute-write attempt against the cursor.
    async fn try_advance(
        &self,
        activity_name: &str,
        group_key: &str,
        member_count: usize,
    ) -> RotorResult<usize> {
        let existing = self.store.round_robin_get(activity_name, group_key).await?;
        match existing {
            None => {
                // First assignment for this key starts the rotation at 0.
                let cursor = RoundRobinCursor::new(activity_name, group_key, 0);
                self.store.round_robin_put(&cursor, None).await?;
                Ok(0)
            }
            Some(mut cursor) => {
                let next = cursor.next_index(member_count);
                let version = cursor.version;
                cursor.advance_to(next);
                self.store.round_robin_put(&cursor, Some(version)).await?;
                Ok(next)
            }
        }
    }
}

#[async_trait]
impl AssigneeSelector for RoundRobinSelector {
    fn strategy(&self) -> AssignmentStrategy {
        AssignmentStrategy::RoundRobin
    }

    async fn select(&self, context: &AssignmentContext) -> RotorResult<AssigneeSelectionResult> {
        context.validate_for(self.strategy())?;
        let (group_key, members) = self.first_matching_group(context).await?;

        let mut attempts = 0;
        let index = loop {
            attempts += 1;
            match self
                .try_advance(&context.activity_name, &group_key, members.len())
                .await
            {
                Ok(index) => break index,
                Err(RotorError::Store(StoreError::VersionConflict { .. }))
                    if attempts < self.max_conflict_retries =>
                {
                    tracing::debug!(
                        activity = %context.activity_name,
                        group = %group_key,
                        attempt = attempts,
                        "round-robin cursor conflict, retrying"
                    );
                }
                Err(RotorError::Store(StoreError::VersionConflict { .. })) => {
                    tracing::warn!(
                        activity = %context.activity_name,
                        group = %group_key,
                        attempts,
                        "round-robin cursor conflict retries exhausted"
                    );
                    return Err(AssignmentError::Conflict {
                        activity_name: context.activity_name.clone(),
                        group_key,
                        attempts,
                    }
                    .into());
                }
                Err(other) => return Err(other),
            }
        };

        let assignee = members[index].clone();
        Ok(AssigneeSelectionResult::individual(
            assignee,
            self.strategy(),
            format!("rotation position {} of group {}", index, group_key),
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
