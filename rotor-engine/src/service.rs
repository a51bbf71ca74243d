//! Assignment orchestration service.
//!
//! Drives a task's assignment lifecycle (`Unassigned -> Pending ->
//! Completed`) over the store and publishes a lifecycle event after every
//! committed mutation. Workflow advancement consumes those events
//! downstream; this service never calls back into it.

use crate::groups::GroupDirectory;
use crate::random::{RandomSource, SeededRandom};
use crate::registry::SelectorRegistry;
use rotor_core::{
    AssigneeSelectionResult, AssignmentContext, AssignmentError, AssignmentStrategy,
    CompletedTask, CorrelationId, EntityId, PendingTask, RotorError, RotorResult, RoutingConfig,
    TaskAssignmentConfiguration, TaskEvent, TaskState, WorkflowCorrelation,
};
use rotor_events::EventPublisher;
use rotor_storage::AssignmentStore;
use std::sync::Arc;

/// Orchestrates workflow task assignment and completion.
pub struct AssignmentService {
    store: Arc<dyn AssignmentStore>,
    registry: SelectorRegistry,
    publisher: Arc<dyn EventPublisher>,
    config: Arc<RoutingConfig>,
}

impl AssignmentService {
    /// Create a service over an already-built registry.
    ///
    /// The configuration is validated here and the registry is checked to
    /// cover every strategy it references, so a wiring defect fails at
    /// startup rather than on the first request that hits it.
    pub fn new(
        store: Arc<dyn AssignmentStore>,
        registry: SelectorRegistry,
        publisher: Arc<dyn EventPublisher>,
        config: Arc<RoutingConfig>,
    ) -> RotorResult<Self> {
        config.validate()?;
        registry.ensure_covers(&config)?;
        Ok(Self {
            store,
            registry,
            publisher,
            config,
        })
    }

    /// Validate the configuration and wire the six standard selectors.
    pub fn standard(
        directory: Arc<dyn GroupDirectory>,
        store: Arc<dyn AssignmentStore>,
        publisher: Arc<dyn EventPublisher>,
        config: RoutingConfig,
    ) -> RotorResult<Self> {
        Self::standard_with_random(
            directory,
            store,
            publisher,
            Arc::new(SeededRandom::from_os()),
            config,
        )
    }

    /// `standard` with an explicit random source, for deterministic tests.
    pub fn standard_with_random(
        directory: Arc<dyn GroupDirectory>,
        store: Arc<dyn AssignmentStore>,
        publisher: Arc<dyn EventPublisher>,
        random: Arc<dyn RandomSource>,
        config: RoutingConfig,
    ) -> RotorResult<Self> {
        let registry = SelectorRegistry::standard(directory, store.clone(), random, &config);
        Self::new(store, registry, publisher, Arc::new(config))
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Start a workflow instance for a request.
    ///
    /// Not idempotent: calling twice for the same request creates two
    /// independent correlations. Avoiding duplicates is the caller's
    /// responsibility.
    pub async fn start_workflow(&self, request_id: EntityId) -> RotorResult<CorrelationId> {
        let correlation = WorkflowCorrelation::new(request_id);
        self.store.correlation_insert(&correlation).await?;
        self.publisher
            .publish(TaskEvent::WorkflowStarted {
                correlation_id: correlation.correlation_id,
                request_id,
                started_at: correlation.started_at,
            })
            .await?;

        tracing::info!(
            correlation_id = %correlation.correlation_id,
            request_id = %request_id,
            "workflow started"
        );
        Ok(correlation.correlation_id)
    }

    /// Assign a task by walking the activity's strategy fallback chain.
    ///
    /// A `NoEligibleAssignee` from one strategy falls through to the next;
    /// any other error aborts immediately. Exhausting the chain fails with
    /// `StrategiesExhausted` and leaves the task unassigned for the caller
    /// to retry or escalate.
    pub async fn assign_task(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
    ) -> RotorResult<AssigneeSelectionResult> {
        let activity = self.config.activity(task_name).ok_or_else(|| {
            AssignmentError::UnknownActivity {
                activity_name: task_name.to_string(),
            }
        })?;

        if self
            .store
            .pending_get(correlation_id, task_name)
            .await?
            .is_some()
        {
            return Err(AssignmentError::DuplicatePendingTask {
                correlation_id,
                task_name: task_name.to_string(),
            }
            .into());
        }

        let context = self.build_context(correlation_id, activity);
        let result = self.select_with_fallback(&context, activity).await?;

        let pending = PendingTask {
            correlation_id,
            task_name: task_name.to_string(),
            activity_name: activity.activity_name.clone(),
            assignee: result.assignee.clone(),
            assignee_type: result.assignee_type,
            strategy: result.strategy,
            assigned_at: result.selected_at,
        };
        self.store.pending_insert(&pending).await?;

        self.publisher
            .publish(TaskEvent::AssignmentCreated {
                correlation_id,
                task_name: pending.task_name.clone(),
                activity_name: pending.activity_name.clone(),
                assignee: pending.assignee.clone(),
                assignee_type: pending.assignee_type,
                strategy: pending.strategy,
                assigned_at: pending.assigned_at,
            })
            .await?;

        tracing::info!(
            correlation_id = %correlation_id,
            task = %task_name,
            assignee = %result.assignee,
            strategy = %result.strategy,
            "task assigned"
        );
        Ok(result)
    }

    /// Resolve a pending task.
    ///
    /// Fails with `NoPendingTask` when there is nothing to complete -
    /// including a second completion of the same task, so completions are
    /// recorded exactly once.
    pub async fn complete_task(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
        action_taken: &str,
    ) -> RotorResult<CompletedTask> {
        let pending = self
            .store
            .pending_get(correlation_id, task_name)
            .await?
            .ok_or_else(|| AssignmentError::NoPendingTask {
                correlation_id,
                task_name: task_name.to_string(),
            })?;

        let completed = pending.complete(action_taken);
        self.store.completed_insert(&completed).await?;
        self.store.pending_delete(correlation_id, task_name).await?;

        self.publisher
            .publish(TaskEvent::TaskCompleted {
                correlation_id,
                task_name: completed.task_name.clone(),
                assignee: completed.assignee.clone(),
                action_taken: completed.action_taken.clone(),
                completed_at: completed.completed_at,
            })
            .await?;

        tracing::info!(
            correlation_id = %correlation_id,
            task = %task_name,
            action = %action_taken,
            "task completed"
        );
        Ok(completed)
    }

    /// Current lifecycle state of a task.
    ///
    /// `Completed` once a completion record exists, `Pending` while an
    /// assignment awaits resolution, `Unassigned` otherwise (never
    /// assigned, or the strategy chain was exhausted).
    pub async fn task_state(
        &self,
        correlation_id: CorrelationId,
        task_name: &str,
    ) -> RotorResult<TaskState> {
        if self
            .store
            .completed_get(correlation_id, task_name)
            .await?
            .is_some()
        {
            return Ok(TaskState::Completed);
        }
        if self
            .store
            .pending_get(correlation_id, task_name)
            .await?
            .is_some()
        {
            return Ok(TaskState::Pending);
        }
        Ok(TaskState::Unassigned)
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn build_context(
        &self,
        correlation_id: CorrelationId,
        activity: &TaskAssignmentConfiguration,
    ) -> AssignmentContext {
        AssignmentContext::new(activity.activity_name.clone())
            .with_strategies(activity.strategies.clone())
            .with_groups(activity.user_groups.clone())
            .with_correlation(correlation_id)
    }

    async fn select_with_fallback(
        &self,
        context: &AssignmentContext,
        activity: &TaskAssignmentConfiguration,
    ) -> RotorResult<AssigneeSelectionResult> {
        let mut attempted: Vec<AssignmentStrategy> = Vec::new();
        for &strategy in &activity.strategies {
            let selector = self.registry.get(strategy)?;
            match selector.select(context).await {
                Ok(result) => return Ok(result),
                Err(err) if err.is_selection_failure() => {
                    tracing::debug!(
                        activity = %activity.activity_name,
                        strategy = %strategy,
                        state = %TaskState::Reassigning,
                        error = %err,
                        "strategy produced no assignee, falling back"
                    );
                    attempted.push(strategy);
                }
                Err(err) => return Err(err),
            }
        }

        tracing::warn!(
            activity = %activity.activity_name,
            attempted = attempted.len(),
            "strategy chain exhausted, task stays unassigned"
        );
        Err(RotorError::from(AssignmentError::StrategiesExhausted {
            activity_name: activity.activity_name.clone(),
            attempted,
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================
