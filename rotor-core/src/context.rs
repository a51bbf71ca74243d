//! Assignment context and selection result types.
//!
//! An `AssignmentContext` is the immutable input descriptor for one routing
//! decision; an `AssigneeSelectionResult` is its output. Neither is
//! persisted.

use crate::{
    AssigneeType, AssignmentStrategy, CorrelationId, SelectionError, Timestamp, UserCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Property key carrying the pre-specified assignee for the Manual strategy.
pub const PROP_ASSIGNEE_ID: &str = "assignee_id";

// ============================================================================
// ASSIGNMENT CONTEXT
// ============================================================================

/// Immutable input descriptor for a routing decision.
///
/// Constructed per routing request by the orchestration from the activity's
/// configuration; strategies only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssignmentContext {
    /// Identifier of the workflow step requesting assignment
    pub activity_name: String,
    /// Ordered list of acceptable strategies (fallback chain)
    pub strategies: Vec<AssignmentStrategy>,
    /// Candidate pool scope
    pub user_groups: Vec<String>,
    /// The requester or previous owner, when relevant to a strategy
    pub user_code: Option<UserCode>,
    /// Workflow instance this decision belongs to (PreviousOwner reads
    /// completion history through it)
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub correlation_id: Option<CorrelationId>,
    /// Deadline informing any SLA-aware strategy
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub due_date: Option<Timestamp>,
    /// Open-ended key/value bag for strategy-specific parameters
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub properties: HashMap<String, serde_json::Value>,
}

impl AssignmentContext {
    /// Create a new context for an activity.
    pub fn new(activity_name: impl Into<String>) -> Self {
        Self {
            activity_name: activity_name.into(),
            strategies: Vec::new(),
            user_groups: Vec::new(),
            user_code: None,
            correlation_id: None,
            due_date: None,
            properties: HashMap::new(),
        }
    }

    /// Set the strategy fallback chain.
    pub fn with_strategies(mut self, strategies: Vec<AssignmentStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Set the candidate user groups.
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.user_groups = groups;
        self
    }

    /// Set the requesting (or previous-owner) user.
    pub fn with_user(mut self, user_code: impl Into<UserCode>) -> Self {
        self.user_code = Some(user_code.into());
        self
    }

    /// Set the workflow correlation.
    pub fn with_correlation(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Set the task due date.
    pub fn with_due_date(mut self, due_date: Timestamp) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Attach a strategy-specific property.
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Read a property as a string, if present and string-valued.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    /// Validate the context for a given strategy.
    ///
    /// Pool-based strategies require a non-empty activity name and at least
    /// one user group; anything else cannot yield a deterministic result.
    pub fn validate_for(&self, strategy: AssignmentStrategy) -> Result<(), SelectionError> {
        if !strategy.requires_candidate_pool() {
            return Ok(());
        }
        if self.activity_name.is_empty() {
            return Err(SelectionError::no_eligible(
                strategy,
                self.activity_name.clone(),
                "activity name is empty",
            ));
        }
        if self.user_groups.is_empty() {
            return Err(SelectionError::no_eligible(
                strategy,
                self.activity_name.clone(),
                "no user groups configured",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SELECTION RESULT
// ============================================================================

/// Outcome of a successful assignee selection.
///
/// Exactly one assignee is produced; a strategy that cannot resolve one
/// fails with `SelectionError::NoEligibleAssignee` instead of returning an
/// empty result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssigneeSelectionResult {
    /// The selected user (or group) code
    pub assignee: UserCode,
    /// Whether the assignee is an individual or a group
    pub assignee_type: AssigneeType,
    /// Strategy that produced the selection
    pub strategy: AssignmentStrategy,
    /// When the selection was made
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub selected_at: Timestamp,
    /// Human-readable rationale note for diagnostics
    pub rationale: String,
}

impl AssigneeSelectionResult {
    /// Create a result for an individual assignee, stamped now.
    pub fn individual(
        assignee: impl Into<UserCode>,
        strategy: AssignmentStrategy,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            assignee: assignee.into(),
            assignee_type: AssigneeType::Individual,
            strategy,
            selected_at: Utc::now(),
            rationale: rationale.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
