//! Routing configuration.
//!
//! Configuration is loaded once at process start and validated eagerly:
//! an invalid strategy chain or supervisor mapping prevents service start
//! instead of surfacing per-request. The loaded config is read-only state
//! for the lifetime of the process.

use crate::{AssignmentStrategy, ConfigError, UserCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment variable holding the routing configuration as inline JSON.
pub const ROUTING_CONFIG_ENV: &str = "ROTOR_ROUTING_CONFIG";

/// Default bound for optimistic-concurrency retries on the round-robin cursor.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

// ============================================================================
// PER-ACTIVITY CONFIGURATION
// ============================================================================

/// Assignment configuration for one workflow activity.
///
/// Supplied by the workflow/activity configuration collaborator; the
/// orchestration builds an `AssignmentContext` from it per routing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskAssignmentConfiguration {
    /// Workflow step this configuration applies to
    pub activity_name: String,
    /// Ordered strategy fallback chain
    pub strategies: Vec<AssignmentStrategy>,
    /// Candidate user groups
    pub user_groups: Vec<String>,
}

// ============================================================================
// SUPERVISOR CONFIGURATION
// ============================================================================

/// Group-to-supervisor routing table for the Supervisor strategy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SupervisorConfig {
    /// Group name to supervisor user code
    pub mapping: HashMap<String, UserCode>,
    /// Fallback when no group matches
    pub default_supervisor: Option<UserCode>,
    /// The set of user codes allowed to be resolved as supervisors
    pub valid_supervisors: Vec<UserCode>,
}

impl SupervisorConfig {
    /// Validate the mapping against the valid-supervisor set.
    ///
    /// Every mapped supervisor and the default must belong to the valid
    /// set; a mapping outside it is a deployment defect.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (group, supervisor) in &self.mapping {
            if !self.valid_supervisors.contains(supervisor) {
                return Err(ConfigError::UnknownSupervisor {
                    group: group.clone(),
                    supervisor: supervisor.clone(),
                });
            }
        }
        if let Some(default) = &self.default_supervisor {
            if !self.valid_supervisors.contains(default) {
                return Err(ConfigError::UnknownSupervisor {
                    group: "<default>".to_string(),
                    supervisor: default.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether a user code is allowed to act as a supervisor.
    pub fn is_valid_supervisor(&self, user_code: &str) -> bool {
        self.valid_supervisors.iter().any(|s| s == user_code)
    }
}

// ============================================================================
// ROUTING CONFIGURATION
// ============================================================================

/// Process-wide routing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoutingConfig {
    /// Per-activity assignment configuration, keyed by activity name
    pub activities: HashMap<String, TaskAssignmentConfiguration>,
    /// Supervisor routing table
    pub supervisor: SupervisorConfig,
    /// Bound for optimistic-concurrency retries on cursor writes
    pub max_conflict_retries: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            activities: HashMap::new(),
            supervisor: SupervisorConfig::default(),
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
        }
    }
}

impl RoutingConfig {
    /// Parse a configuration from a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RoutingConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidValue {
                field: "routing_config".to_string(),
                value: json.chars().take(80).collect(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from `ROTOR_ROUTING_CONFIG`.
    ///
    /// Fails fast when the variable is missing or its content is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let json =
            std::env::var(ROUTING_CONFIG_ENV).map_err(|_| ConfigError::MissingRequired {
                field: ROUTING_CONFIG_ENV.to_string(),
            })?;
        Self::from_json_str(&json)
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_conflict_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_conflict_retries".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        for (key, activity) in &self.activities {
            if activity.activity_name.is_empty() {
                return Err(ConfigError::MissingRequired {
                    field: format!("activities.{}.activity_name", key),
                });
            }
            if activity.strategies.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("activities.{}.strategies", key),
                    value: "[]".to_string(),
                    reason: "strategy chain must not be empty".to_string(),
                });
            }
            let needs_pool = activity
                .strategies
                .iter()
                .any(|s| s.requires_candidate_pool());
            if needs_pool && activity.user_groups.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("activities.{}.user_groups", key),
                    value: "[]".to_string(),
                    reason: "pool-based strategies require at least one group".to_string(),
                });
            }
        }

        self.supervisor.validate()
    }

    /// Look up the configuration for an activity.
    pub fn activity(&self, activity_name: &str) -> Option<&TaskAssignmentConfiguration> {
        self.activities.get(activity_name)
    }

    /// Register an activity configuration (builder-style, for tests and
    /// embedders that assemble config in code).
    pub fn with_activity(mut self, activity: TaskAssignmentConfiguration) -> Self {
        self.activities
            .insert(activity.activity_name.clone(), activity);
        self
    }

    /// Set the supervisor table (builder-style).
    pub fn with_supervisor(mut self, supervisor: SupervisorConfig) -> Self {
        self.supervisor = supervisor;
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn review_activity() -> TaskAssignmentConfiguration {
        TaskAssignmentConfiguration {
            activity_name: "Review".to_string(),
            strategies: vec![AssignmentStrategy::RoundRobin, AssignmentStrategy::Random],
            user_groups: vec!["appraisers".to_string()],
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(RoutingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_strategy_chain_rejected() {
        let config = RoutingConfig::default().with_activity(TaskAssignmentConfiguration {
            activity_name: "Review".to_string(),
            strategies: vec![],
            user_groups: vec!["appraisers".to_string()],
        });
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field.contains("strategies")));
    }

    #[test]
    fn test_pool_strategy_without_groups_rejected() {
        let config = RoutingConfig::default().with_activity(TaskAssignmentConfiguration {
            activity_name: "Review".to_string(),
            strategies: vec![AssignmentStrategy::WorkloadBased],
            user_groups: vec![],
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_supervisor_only_activity_needs_no_groups() {
        let config = RoutingConfig::default().with_activity(TaskAssignmentConfiguration {
            activity_name: "Escalation".to_string(),
            strategies: vec![AssignmentStrategy::Supervisor],
            user_groups: vec![],
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unmapped_supervisor_rejected() {
        let supervisor = SupervisorConfig {
            mapping: HashMap::from([(
                "underwriters".to_string(),
                "supervisor-003".to_string(),
            )]),
            default_supervisor: None,
            valid_supervisors: vec!["supervisor-001".to_string()],
        };
        let err = supervisor.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSupervisor { .. }));
    }

    #[test]
    fn test_invalid_default_supervisor_rejected() {
        let supervisor = SupervisorConfig {
            mapping: HashMap::new(),
            default_supervisor: Some("ghost".to_string()),
            valid_supervisors: vec!["supervisor-001".to_string()],
        };
        assert!(supervisor.validate().is_err());
    }

    #[test]
    fn test_zero_retry_bound_rejected() {
        let config = RoutingConfig {
            max_conflict_retries: 0,
            ..RoutingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "max_conflict_retries"));
    }

    #[test]
    fn test_from_json_str_roundtrip() {
        let config = RoutingConfig::default()
            .with_activity(review_activity())
            .with_supervisor(SupervisorConfig {
                mapping: HashMap::from([(
                    "underwriters".to_string(),
                    "supervisor-003".to_string(),
                )]),
                default_supervisor: Some("supervisor-001".to_string()),
                valid_supervisors: vec![
                    "supervisor-001".to_string(),
                    "supervisor-003".to_string(),
                ],
            });

        let json = serde_json::to_string(&config).expect("serialize config");
        let loaded = RoutingConfig::from_json_str(&json).expect("load config");
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.activity("Review").map(|a| a.strategies.clone()),
            Some(vec![AssignmentStrategy::RoundRobin, AssignmentStrategy::Random])
        );
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(RoutingConfig::from_json_str("not json").is_err());
    }
}
