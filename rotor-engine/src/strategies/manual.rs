//! Manual strategy: a pre-specified assignee carried in the context.

use crate::selector::AssigneeSelector;
use ::async_trait::async_trait;
use rotor_core::{
    AssigneeSelectionResult, AssignmentContext, AssignmentStrategy, RotorResult, SelectionError,
    PROP_ASSIGNEE_ID,
};

/// Returns the assignee named in `properties["assignee_id"]`.
///
/// An absent or non-string property is a `NoEligibleAssignee` failure;
/// a default assignee is never silently substituted.
#[derive(Debug, Default, Clone)]
pub struct ManualSelector;

impl ManualSelector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AssigneeSelector for ManualSelector {
    fn strategy(&self) -> AssignmentStrategy {
        AssignmentStrategy::Manual
    }

    async fn select(&self, context: &AssignmentContext) -> RotorResult<AssigneeSelectionResult> {
        let assignee = context.property_str(PROP_ASSIGNEE_ID).ok_or_else(|| {
            SelectionError::no_eligible(
                self.strategy(),
                context.activity_name.clone(),
                format!("property {:?} is not set", PROP_ASSIGNEE_ID),
            )
        })?;

        Ok(AssigneeSelectionResult::individual(
            assignee,
            self.strategy(),
            "pre-specified assignee",
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rotor_core::{RotorError, SelectionError};

    #[tokio::test]
    async fn test_manual_returns_specified_assignee() {
        let ctx = AssignmentContext::new("Review").with_property(PROP_ASSIGNEE_ID, "u-007");
        let result = ManualSelector::new().select(&ctx).await.unwrap();
        assert_eq!(result.assignee, "u-007");
        assert_eq!(result.strategy, AssignmentStrategy::Manual);
    }

    #[tokio::test]
    async fn test_manual_fails_without_property() {
        let ctx = AssignmentContext::new("Review");
        let err = ManualSelector::new().select(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            RotorError::Selection(SelectionError::NoEligibleAssignee { .. })
        ));
    }

    #[tokio::test]
    async fn test_manual_fails_on_non_string_property() {
        let ctx = AssignmentContext::new("Review").with_property(PROP_ASSIGNEE_ID, 12345);
        assert!(ManualSelector::new().select(&ctx).await.is_err());
    }
}
