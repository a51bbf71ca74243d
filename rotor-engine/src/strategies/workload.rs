//! Workload-based strategy: fewest open tasks wins.

use crate::groups::{resolve_members, GroupDirectory};
use crate::selector::AssigneeSelector;
use ::async_trait::async_trait;
use rotor_core::{
    AssigneeSelectionResult, AssignmentContext, AssignmentStrategy, RotorResult, SelectionError,
};
use rotor_storage::AssignmentStore;
use std::sync::Arc;

/// Picks the candidate with the fewest open pending tasks.
///
/// Candidates come from every configured group, de-duplicated in
/// first-occurrence order. Ties go to the first-encountered minimum
/// (strict `<` comparison), which keeps selection deterministic for a
/// fixed candidate order.
pub struct WorkloadSelector {
    directory: Arc<dyn GroupDirectory>,
    store: Arc<dyn AssignmentStore>,
}

impl WorkloadSelector {
    pub fn new(directory: Arc<dyn GroupDirectory>, store: Arc<dyn AssignmentStore>) -> Self {
        Self { directory, store }
    }
}

#[async_trait]
impl AssigneeSelector for WorkloadSelector {
    fn strategy(&self) -> AssignmentStrategy {
        AssignmentStrategy::WorkloadBased
    }

    async fn select(&self, context: &AssignmentContext) -> RotorResult<AssigneeSelectionResult> {
        context.validate_for(self.strategy())?;
        let pool = resolve_members(self.directory.as_ref(), &context.user_groups).await?;
        if pool.is_empty() {
            return Err(SelectionError::no_eligible(
                self.strategy(),
                context.activity_name.clone(),
                "no configured group has members",
            )
            .into());
        }

        let mut counts = Vec::with_capacity(pool.len());
        for member in &pool {
            counts.push(self.store.count_open_for_user(member).await?);
        }

        let mut best = 0;
        for (index, count) in counts.iter().enumerate().skip(1) {
            if *count < counts[best] {
                best = index;
            }
        }

        let open = counts[best];
        Ok(AssigneeSelectionResult::individual(
            pool[best].clone(),
            self.strategy(),
            format!("{} open tasks, fewest among {} candidates", open, pool.len()),
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
