//! Enum types for ROTOR entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ASSIGNMENT STRATEGY
// ============================================================================

/// Policy used to pick an assignee for a workflow task.
///
/// Strategies are configured per activity as an ordered fallback chain;
/// the orchestration tries each in turn until one produces an assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AssignmentStrategy {
    /// A pre-specified assignee is carried in the context properties
    Manual,
    /// Rotate fairly through group members via a persisted cursor
    RoundRobin,
    /// Pick the group member with the fewest open tasks
    WorkloadBased,
    /// Pick a group member uniformly at random
    Random,
    /// Re-assign to whoever completed the previous task in the workflow
    PreviousOwner,
    /// Route to the configured supervisor of the acting user's group
    Supervisor,
}

impl AssignmentStrategy {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            AssignmentStrategy::Manual => "Manual",
            AssignmentStrategy::RoundRobin => "RoundRobin",
            AssignmentStrategy::WorkloadBased => "WorkloadBased",
            AssignmentStrategy::Random => "Random",
            AssignmentStrategy::PreviousOwner => "PreviousOwner",
            AssignmentStrategy::Supervisor => "Supervisor",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, AssignmentStrategyParseError> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(AssignmentStrategy::Manual),
            "roundrobin" | "round_robin" | "round-robin" => Ok(AssignmentStrategy::RoundRobin),
            "workloadbased" | "workload_based" | "workload-based" => {
                Ok(AssignmentStrategy::WorkloadBased)
            }
            "random" => Ok(AssignmentStrategy::Random),
            "previousowner" | "previous_owner" | "previous-owner" => {
                Ok(AssignmentStrategy::PreviousOwner)
            }
            "supervisor" => Ok(AssignmentStrategy::Supervisor),
            _ => Err(AssignmentStrategyParseError(s.to_string())),
        }
    }

    /// Whether this strategy selects out of a resolved group member pool.
    ///
    /// Pool-based strategies require a non-empty activity name and at least
    /// one user group in the context to produce a deterministic result.
    pub fn requires_candidate_pool(&self) -> bool {
        matches!(
            self,
            AssignmentStrategy::RoundRobin
                | AssignmentStrategy::WorkloadBased
                | AssignmentStrategy::Random
        )
    }

    /// All strategy variants, in configuration order.
    pub fn all() -> [AssignmentStrategy; 6] {
        [
            AssignmentStrategy::Manual,
            AssignmentStrategy::RoundRobin,
            AssignmentStrategy::WorkloadBased,
            AssignmentStrategy::Random,
            AssignmentStrategy::PreviousOwner,
            AssignmentStrategy::Supervisor,
        ]
    }
}

impl fmt::Display for AssignmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for AssignmentStrategy {
    type Err = AssignmentStrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid assignment strategy string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentStrategyParseError(pub String);

impl fmt::Display for AssignmentStrategyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid assignment strategy: {}", self.0)
    }
}

impl std::error::Error for AssignmentStrategyParseError {}

// ============================================================================
// ASSIGNEE TYPE
// ============================================================================

/// Whether a selection resolved to an individual user or a whole group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AssigneeType {
    /// A single user
    Individual,
    /// A user group (the group works the task from a shared queue)
    Group,
}

impl AssigneeType {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            AssigneeType::Individual => "Individual",
            AssigneeType::Group => "Group",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, AssigneeTypeParseError> {
        match s.to_lowercase().as_str() {
            "individual" | "user" => Ok(AssigneeType::Individual),
            "group" => Ok(AssigneeType::Group),
            _ => Err(AssigneeTypeParseError(s.to_string())),
        }
    }
}

impl fmt::Display for AssigneeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for AssigneeType {
    type Err = AssigneeTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid assignee type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeTypeParseError(pub String);

impl fmt::Display for AssigneeTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid assignee type: {}", self.0)
    }
}

impl std::error::Error for AssigneeTypeParseError {}

// ============================================================================
// TASK STATE
// ============================================================================

/// Lifecycle state of a workflow task's assignment.
///
/// ```text
/// Unassigned ── assign ──→ Pending ── complete ──→ Completed (terminal)
///      │  ↑                    │
///      │  └──── fallback ──────┘ (Reassigning, transient)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TaskState {
    /// No assignee yet; assignment failed or was never attempted
    Unassigned,
    /// Assigned and awaiting completion
    Pending,
    /// A strategy fallback is in flight
    Reassigning,
    /// Resolved (terminal)
    Completed,
}

impl TaskState {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TaskState::Unassigned => "Unassigned",
            TaskState::Pending => "Pending",
            TaskState::Reassigning => "Reassigning",
            TaskState::Completed => "Completed",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, TaskStateParseError> {
        match s.to_lowercase().as_str() {
            "unassigned" => Ok(TaskState::Unassigned),
            "pending" => Ok(TaskState::Pending),
            "reassigning" => Ok(TaskState::Reassigning),
            "completed" | "complete" => Ok(TaskState::Completed),
            _ => Err(TaskStateParseError(s.to_string())),
        }
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for TaskState {
    type Err = TaskStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid task state string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStateParseError(pub String);

impl fmt::Display for TaskStateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid task state: {}", self.0)
    }
}

impl std::error::Error for TaskStateParseError {}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_roundtrip() {
        for strategy in AssignmentStrategy::all() {
            let db_str = strategy.as_db_str();
            let parsed = AssignmentStrategy::from_db_str(db_str).unwrap();
            assert_eq!(strategy, parsed);
        }
    }

    #[test]
    fn test_strategy_parse_aliases() {
        assert_eq!(
            AssignmentStrategy::from_db_str("round_robin").unwrap(),
            AssignmentStrategy::RoundRobin
        );
        assert_eq!(
            AssignmentStrategy::from_db_str("workload-based").unwrap(),
            AssignmentStrategy::WorkloadBased
        );
        assert!(AssignmentStrategy::from_db_str("nearest").is_err());
    }

    #[test]
    fn test_strategy_pool_requirement() {
        assert!(AssignmentStrategy::RoundRobin.requires_candidate_pool());
        assert!(AssignmentStrategy::WorkloadBased.requires_candidate_pool());
        assert!(AssignmentStrategy::Random.requires_candidate_pool());
        assert!(!AssignmentStrategy::Manual.requires_candidate_pool());
        assert!(!AssignmentStrategy::PreviousOwner.requires_candidate_pool());
        assert!(!AssignmentStrategy::Supervisor.requires_candidate_pool());
    }

    #[test]
    fn test_assignee_type_roundtrip() {
        for t in [AssigneeType::Individual, AssigneeType::Group] {
            assert_eq!(AssigneeType::from_db_str(t.as_db_str()).unwrap(), t);
        }
    }

    #[test]
    fn test_task_state_terminal() {
        assert!(TaskState::Completed.is_terminal());
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::Unassigned.is_terminal());
        assert!(!TaskState::Reassigning.is_terminal());
    }

    #[test]
    fn test_task_state_roundtrip() {
        for state in [
            TaskState::Unassigned,
            TaskState::Pending,
            TaskState::Reassigning,
            TaskState::Completed,
        ] {
            assert_eq!(TaskState::from_db_str(state.as_db_str()).unwrap(), state);
        }
    }
}
