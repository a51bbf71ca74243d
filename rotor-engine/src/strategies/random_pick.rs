//! Random strategy: uniform pick over the candidate pool.

use crate::groups::{resolve_members, GroupDirectory};
use crate::random::RandomSource;
use crate::selector::AssigneeSelector;
use ::async_trait::async_trait;
use rotor_core::{
    AssigneeSelectionResult, AssignmentContext, AssignmentStrategy, RotorResult, SelectionError,
};
use std::sync::Arc;

/// Picks uniformly at random from the de-duplicated candidate pool.
pub struct RandomSelector {
    directory: Arc<dyn GroupDirectory>,
    random: Arc<dyn RandomSource>,
}

impl RandomSelector {
    pub fn new(directory: Arc<dyn GroupDirectory>, random: Arc<dyn RandomSource>) -> Self {
        Self { directory, random }
    }
}

#[async_trait]
impl AssigneeSelector for RandomSelector {
    fn strategy(&self) -> AssignmentStrategy {
        AssignmentStrategy::Random
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

        let index = self.random.pick(pool.len());
        Ok(AssigneeSelectionResult::individual(
            pool[index].clone(),
            self.strategy(),
            format!("uniform pick among {} candidates", pool.len()),
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
