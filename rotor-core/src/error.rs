//! Error types for ROTOR operations

use crate::{AssignmentStrategy, CorrelationId};
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found: {kind} with key {key}")]
    NotFound { kind: String, key: String },

    #[error("Insert failed for {kind}: {reason}")]
    InsertFailed { kind: String, reason: String },

    #[error("Update failed for {kind} with key {key}: {reason}")]
    UpdateFailed {
        kind: String,
        key: String,
        reason: String,
    },

    #[error("Version conflict on round-robin cursor ({activity_name}, {group_key})")]
    VersionConflict {
        activity_name: String,
        group_key: String,
    },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Selection errors: business-expected failures of a single strategy.
///
/// These are normal fallback-path outcomes, recoverable by trying the next
/// strategy in the configured chain or by operator escalation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No eligible assignee for {strategy} on activity {activity_name}: {reason}")]
    NoEligibleAssignee {
        strategy: AssignmentStrategy,
        activity_name: String,
        reason: String,
    },
}

impl SelectionError {
    /// Build the standard no-eligible-assignee failure.
    pub fn no_eligible(
        strategy: AssignmentStrategy,
        activity_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SelectionError::NoEligibleAssignee {
            strategy,
            activity_name: activity_name.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration errors. Fatal at startup; never retried at call time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No selector registered for strategy {strategy}")]
    StrategyNotRegistered { strategy: AssignmentStrategy },

    #[error("Supervisor {supervisor} mapped for group {group} is not in the valid-supervisor set")]
    UnknownSupervisor { group: String, supervisor: String },
}

/// Assignment orchestration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignmentError {
    #[error(
        "Assignment conflict on ({activity_name}, {group_key}) after {attempts} attempts"
    )]
    Conflict {
        activity_name: String,
        group_key: String,
        attempts: u32,
    },

    #[error("All {} configured strategies failed for activity {activity_name}", .attempted.len())]
    StrategiesExhausted {
        activity_name: String,
        attempted: Vec<AssignmentStrategy>,
    },

    #[error("No pending task for correlation {correlation_id}, task {task_name}")]
    NoPendingTask {
        correlation_id: CorrelationId,
        task_name: String,
    },

    #[error("A pending task already exists for correlation {correlation_id}, task {task_name}")]
    DuplicatePendingTask {
        correlation_id: CorrelationId,
        task_name: String,
    },

    #[error("No assignment configuration for activity {activity_name}")]
    UnknownActivity { activity_name: String },
}

/// Master error type for all ROTOR errors.
#[derive(Debug, Clone, Error)]
pub enum RotorError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Assignment error: {0}")]
    Assignment(#[from] AssignmentError),
}

impl RotorError {
    /// Whether this error is a per-strategy selection failure that the
    /// orchestration may absorb by falling back to the next strategy.
    pub fn is_selection_failure(&self) -> bool {
        matches!(self, RotorError::Selection(_))
    }

    /// Whether the caller may retry the whole operation.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RotorError::Assignment(AssignmentError::Conflict { .. })
                | RotorError::Store(StoreError::VersionConflict { .. })
        )
    }
}

/// Result type alias for ROTOR operations.
pub type RotorResult<T> = Result<T, RotorError>;

// =============================================================================
// TESTS
// =============================================================================
