//! Supervisor strategy: escalate to the acting group's supervisor.

use crate::selector::AssigneeSelector;
use ::async_trait::async_trait;
use rotor_core::{
    AssigneeSelectionResult, AssignmentContext, AssignmentStrategy, RotorResult, SelectionError,
    SupervisorConfig,
};
use std::sync::Arc;

/// Maps the context's groups (the acting user's groups) to a configured
/// supervisor, falling back to the configured default.
///
/// The supervisor table is validated at startup; the valid-supervisor set
/// is re-checked here so a misconfigured mapping degrades into a normal
/// `NoEligibleAssignee` fallback instead of routing to an unknown user.
pub struct SupervisorSelector {
    config: Arc<SupervisorConfig>,
}

impl SupervisorSelector {
    pub fn new(config: Arc<SupervisorConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AssigneeSelector for SupervisorSelector {
    fn strategy(&self) -> AssignmentStrategy {
        AssignmentStrategy::Supervisor
    }

    async fn select(&self, context: &AssignmentContext) -> RotorResult<AssigneeSelectionResult> {
        let mapped = context
            .user_groups
            .iter()
            .find_map(|group| self.config.mapping.get(group).map(|s| (group.clone(), s)));

        let (rationale, supervisor) = match mapped {
            Some((group, supervisor)) => {
                (format!("supervisor of group {}", group), supervisor.clone())
            }
            None => match &self.config.default_supervisor {
                Some(default) => ("default supervisor".to_string(), default.clone()),
                None => {
                    return Err(SelectionError::no_eligible(
                        self.strategy(),
                        context.activity_name.clone(),
                        "no group mapping and no default supervisor configured",
                    )
                    .into())
                }
            },
        };

        if !self.config.is_valid_supervisor(&supervisor) {
            return Err(SelectionError::no_eligible(
                self.strategy(),
                context.activity_name.clone(),
                format!("resolved supervisor {} is not in the valid set", supervisor),
            )
            .into());
        }

        Ok(AssigneeSelectionResult::individual(
            supervisor,
            self.strategy(),
            rationale,
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rotor_core::RotorError;
    use std::collections::HashMap;

    fn config() -> Arc<SupervisorConfig> {
        Arc::new(SupervisorConfig {
            mapping: HashMap::from([("underwriters".to_string(), "supervisor-003".to_string())]),
            default_supervisor: Some("supervisor-001".to_string()),
            valid_supervisors: vec!["supervisor-001".to_string(), "supervisor-003".to_string()],
        })
    }

    #[tokio::test]
    async fn test_mapped_group_resolves_its_supervisor() {
        let selector = SupervisorSelector::new(config());
        let ctx =
            AssignmentContext::new("Escalation").with_groups(vec!["underwriters".to_string()]);
        let result = selector.select(&ctx).await.unwrap();
        assert_eq!(result.assignee, "supervisor-003");
    }

    #[tokio::test]
    async fn test_unmapped_group_falls_back_to_default() {
        let selector = SupervisorSelector::new(config());
        let ctx = AssignmentContext::new("Escalation").with_groups(vec!["clerks".to_string()]);
        let result = selector.select(&ctx).await.unwrap();
        assert_eq!(result.assignee, "supervisor-001");
    }

    #[tokio::test]
    async fn test_no_mapping_no_default_fails() {
        let selector = SupervisorSelector::new(Arc::new(SupervisorConfig::default()));
        let ctx = AssignmentContext::new("Escalation").with_groups(vec!["clerks".to_string()]);
        let err = selector.select(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            RotorError::Selection(SelectionError::NoEligibleAssignee { .. })
        ));
    }

    #[tokio::test]
    async fn test_supervisor_outside_valid_set_fails() {
        let selector = SupervisorSelector::new(Arc::new(SupervisorConfig {
            mapping: HashMap::from([("underwriters".to_string(), "ghost".to_string())]),
            default_supervisor: None,
            valid_supervisors: vec!["supervisor-001".to_string()],
        }));
        let ctx =
            AssignmentContext::new("Escalation").with_groups(vec!["underwriters".to_string()]);
        assert!(selector.select(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_first_mapped_group_wins() {
        let selector = SupervisorSelector::new(config());
        let ctx = AssignmentContext::new("Escalation")
            .with_groups(vec!["clerks".to_string(), "underwriters".to_string()]);
        let result = selector.select(&ctx).await.unwrap();
        assert_eq!(result.assignee, "supervisor-003");
    }
}
