//! Event publishing trait.
//!
//! The engine publishes a lifecycle event after every durably committed
//! state mutation and never before. Delivery is at-least-once: an
//! implementation may re-deliver on retry, and downstream consumers are
//! expected to de-duplicate by correlation and task identity.

use ::async_trait::async_trait;
use rotor_core::{RotorResult, TaskEvent};

/// Trait for the outbound messaging boundary.
///
/// Implementations bridge to the host's message bus (outbox relay, broker
/// client, ...). Publishing must not call back into the engine.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one lifecycle event.
    async fn publish(&self, event: TaskEvent) -> RotorResult<()>;
}
