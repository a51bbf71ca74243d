//! ROTOR Test Utilities
//!
//! Centralized test infrastructure for the ROTOR workspace:
//! - Proptest generators for contexts, strategies, and group memberships
//! - Fixtures for common routing configurations
//! - Re-exports of the in-memory store and event bus

// Re-export the in-memory implementations from their source crates
pub use rotor_events::InMemoryEventBus;
pub use rotor_storage::MemoryStore;

// Re-export core types for convenience
pub use rotor_core::{
    AssigneeSelectionResult, AssigneeType, AssignmentContext, AssignmentStrategy, CompletedTask,
    CorrelationId, PendingTask, RotorError, RotorResult, RoutingConfig, SupervisorConfig,
    TaskAssignmentConfiguration, TaskEvent, Timestamp, UserCode, WorkflowCorrelation,
};

use chrono::Utc;
use proptest::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Any assignment strategy.
pub fn arb_strategy() -> impl Strategy<Value = AssignmentStrategy> {
    prop_oneof![
        Just(AssignmentStrategy::Manual),
        Just(AssignmentStrategy::RoundRobin),
        Just(AssignmentStrategy::WorkloadBased),
        Just(AssignmentStrategy::Random),
        Just(AssignmentStrategy::PreviousOwner),
        Just(AssignmentStrategy::Supervisor),
    ]
}

/// A plausible directory user code, e.g. `u-042`.
pub fn arb_user_code() -> impl Strategy<Value = UserCode> {
    (0u32..1000).prop_map(|n| format!("u-{:03}", n))
}

/// A distinct, non-empty group membership of 1 to `max` users.
pub fn arb_members(max: usize) -> impl Strategy<Value = Vec<UserCode>> {
    prop::collection::hash_set(0u32..1000, 1..=max).prop_map(|set| {
        set.into_iter().map(|n| format!("u-{:03}", n)).collect()
    })
}

/// A group name drawn from the appraisal domain.
pub fn arb_group_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("appraisers".to_string()),
        Just("reviewers".to_string()),
        Just("underwriters".to_string()),
        Just("clerks".to_string()),
    ]
}

/// An assignment context with a random activity, strategy chain, and groups.
pub fn arb_context() -> impl Strategy<Value = AssignmentContext> {
    (
        "[A-Z][a-z]{2,10}",
        prop::collection::vec(arb_strategy(), 1..4),
        prop::collection::vec(arb_group_name(), 0..3),
    )
        .prop_map(|(activity, strategies, groups)| {
            AssignmentContext::new(activity)
                .with_strategies(strategies)
                .with_groups(groups)
        })
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A pending task for `assignee`, fresh correlation, named activity.
pub fn fixture_pending(activity: &str, assignee: &str) -> PendingTask {
    PendingTask {
        correlation_id: Uuid::now_v7(),
        task_name: activity.to_string(),
        activity_name: activity.to_string(),
        assignee: assignee.to_string(),
        assignee_type: AssigneeType::Individual,
        strategy: AssignmentStrategy::RoundRobin,
        assigned_at: Utc::now(),
    }
}

/// A routing config with one activity and a valid supervisor table.
pub fn fixture_config(
    activity: &str,
    strategies: Vec<AssignmentStrategy>,
    groups: Vec<&str>,
) -> RoutingConfig {
    RoutingConfig::default()
        .with_activity(TaskAssignmentConfiguration {
            activity_name: activity.to_string(),
            strategies,
            user_groups: groups.into_iter().map(str::to_string).collect(),
        })
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
        })
}

// =============================================================================
// TESTS
// =============================================================================
