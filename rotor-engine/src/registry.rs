//! Strategy-to-selector dispatch table.

use crate::groups::GroupDirectory;
use crate::random::RandomSource;
use crate::selector::AssigneeSelector;
use crate::strategies::{
    ManualSelector, PreviousOwnerSelector, RandomSelector, RoundRobinSelector, SupervisorSelector,
    WorkloadSelector,
};
use rotor_core::{AssignmentStrategy, ConfigError, RotorResult, RoutingConfig};
use rotor_storage::AssignmentStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup table from strategy to selector, built once at startup.
///
/// A strategy without a registered selector is a wiring defect
/// (`ConfigError::StrategyNotRegistered`), distinct from the business
/// `NoEligibleAssignee` failure.
pub struct SelectorRegistry {
    selectors: HashMap<AssignmentStrategy, Arc<dyn AssigneeSelector>>,
}

impl SelectorRegistry {
    /// Start building an empty registry.
    pub fn builder() -> SelectorRegistryBuilder {
        SelectorRegistryBuilder {
            selectors: HashMap::new(),
        }
    }

    /// Wire all six standard selectors from their dependencies.
    pub fn standard(
        directory: Arc<dyn GroupDirectory>,
        store: Arc<dyn AssignmentStore>,
        random: Arc<dyn RandomSource>,
        config: &RoutingConfig,
    ) -> Self {
        let round_robin = RoundRobinSelector::new(directory.clone(), store.clone())
            .with_max_conflict_retries(config.max_conflict_retries);
        Self::builder()
            .register(Arc::new(ManualSelector::new()))
            .register(Arc::new(round_robin))
            .register(Arc::new(WorkloadSelector::new(
                directory.clone(),
                store.clone(),
            )))
            .register(Arc::new(RandomSelector::new(directory, random)))
            .register(Arc::new(PreviousOwnerSelector::new(store)))
            .register(Arc::new(SupervisorSelector::new(Arc::new(
                config.supervisor.clone(),
            ))))
            .build()
    }

    /// Get the selector for a strategy.
    pub fn get(&self, strategy: AssignmentStrategy) -> RotorResult<&Arc<dyn AssigneeSelector>> {
        self.selectors
            .get(&strategy)
            .ok_or_else(|| ConfigError::StrategyNotRegistered { strategy }.into())
    }

    /// Verify that every strategy the configuration references has a
    /// registered selector.
    ///
    /// Run at startup so a wiring defect prevents service start instead of
    /// surfacing on the first request that hits the unregistered strategy.
    pub fn ensure_covers(&self, config: &RoutingConfig) -> RotorResult<()> {
        for activity in config.activities.values() {
            for &strategy in &activity.strategies {
                self.get(strategy)?;
            }
        }
        Ok(())
    }

    /// Strategies with a registered selector.
    pub fn registered(&self) -> Vec<AssignmentStrategy> {
        let mut strategies: Vec<_> = self.selectors.keys().copied().collect();
        strategies.sort_by_key(|s| s.as_db_str());
        strategies
    }
}

/// Builder for a `SelectorRegistry`.
pub struct SelectorRegistryBuilder {
    selectors: HashMap<AssignmentStrategy, Arc<dyn AssigneeSelector>>,
}

impl SelectorRegistryBuilder {
    /// Register a selector under the strategy it reports.
    pub fn register(mut self, selector: Arc<dyn AssigneeSelector>) -> Self {
        self.selectors.insert(selector.strategy(), selector);
        self
    }

    pub fn build(self) -> SelectorRegistry {
        SelectorRegistry {
            selectors: self.selectors,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::StaticGroupDirectory;
    use crate::random::SeededRandom;
    use rotor_core::RotorError;
    use rotor_storage::MemoryStore;

    fn standard_registry() -> SelectorRegistry {
        SelectorRegistry::standard(
            Arc::new(StaticGroupDirectory::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(SeededRandom::from_seed(1)),
            &RoutingConfig::default(),
        )
    }

    #[test]
    fn test_standard_registry_covers_all_strategies() {
        let registry = standard_registry();
        for strategy in AssignmentStrategy::all() {
            assert!(registry.get(strategy).is_ok(), "missing {}", strategy);
        }
        assert_eq!(registry.registered().len(), 6);
    }

    #[test]
    fn test_missing_registration_is_config_error() {
        let registry = SelectorRegistry::builder()
            .register(Arc::new(crate::strategies::ManualSelector::new()))
            .build();

        let err = registry.get(AssignmentStrategy::RoundRobin).err().unwrap();
        assert!(matches!(
            err,
            RotorError::Config(ConfigError::StrategyNotRegistered {
                strategy: AssignmentStrategy::RoundRobin
            })
        ));
    }

    #[test]
    fn test_ensure_covers_flags_missing_wiring() {
        let registry = SelectorRegistry::builder()
            .register(Arc::new(crate::strategies::ManualSelector::new()))
            .build();

        let manual_only = RoutingConfig::default().with_activity(
            rotor_core::TaskAssignmentConfiguration {
                activity_name: "Intake".to_string(),
                strategies: vec![AssignmentStrategy::Manual],
                user_groups: vec![],
            },
        );
        assert!(registry.ensure_covers(&manual_only).is_ok());

        let wants_random = RoutingConfig::default().with_activity(
            rotor_core::TaskAssignmentConfiguration {
                activity_name: "Review".to_string(),
                strategies: vec![AssignmentStrategy::Manual, AssignmentStrategy::Random],
                user_groups: vec!["appraisers".to_string()],
            },
        );
        assert!(matches!(
            registry.ensure_covers(&wants_random).unwrap_err(),
            RotorError::Config(ConfigError::StrategyNotRegistered {
                strategy: AssignmentStrategy::Random
            })
        ));
    }

    #[test]
    fn test_selector_reports_its_strategy() {
        let registry = standard_registry();
        for strategy in AssignmentStrategy::all() {
            let selector = registry.get(strategy).unwrap();
            assert_eq!(selector.strategy(), strategy);
        }
    }
}
