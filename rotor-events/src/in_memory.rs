//! In-memory event bus for tests and single-process embedders.

use crate::publisher::EventPublisher;
use ::async_trait::async_trait;
use rotor_core::{RotorResult, StoreError, TaskEvent};
use std::sync::{Arc, RwLock};

/// Event bus that records every published event in order.
///
/// Tests assert on the captured sequence; side effects of the orchestration
/// are observable only through it.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventBus {
    events: Arc<RwLock<Vec<TaskEvent>>>,
}

impl InMemoryEventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far, in publication order.
    pub fn published(&self) -> Vec<TaskEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of events published so far.
    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    /// Whether nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the captured events, leaving the bus empty.
    pub fn take(&self) -> Vec<TaskEvent> {
        self.events
            .write()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: TaskEvent) -> RotorResult<()> {
        let mut events = self.events.write().map_err(|_| StoreError::LockPoisoned)?;
        events.push(event);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_publish_captures_in_order() {
        let bus = InMemoryEventBus::new();
        let correlation_id = Uuid::now_v7();

        bus.publish(TaskEvent::WorkflowStarted {
            correlation_id,
            request_id: Uuid::now_v7(),
            started_at: Utc::now(),
        })
        .await
        .unwrap();
        bus.publish(TaskEvent::TaskCompleted {
            correlation_id,
            task_name: "Review".to_string(),
            assignee: "u-001".to_string(),
            action_taken: "Approved".to_string(),
            completed_at: Utc::now(),
        })
        .await
        .unwrap();

        let events = bus.published();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "WorkflowStarted");
        assert_eq!(events[1].event_type(), "TaskCompleted");
    }

    #[tokio::test]
    async fn test_take_drains() {
        let bus = InMemoryEventBus::new();
        bus.publish(TaskEvent::WorkflowStarted {
            correlation_id: Uuid::now_v7(),
            request_id: Uuid::now_v7(),
            started_at: Utc::now(),
        })
        .await
        .unwrap();

        assert_eq!(bus.take().len(), 1);
        assert!(bus.is_empty());
    }
}
