//! ROTOR Events - Event Publishing Trait and In-Memory Bus
//!
//! This crate defines the `EventPublisher` trait for the outbound
//! messaging boundary without providing a broker implementation. The
//! engine publishes `WorkflowStarted`, `AssignmentCreated`, and
//! `TaskCompleted` after each committed state mutation; workflow
//! advancement happens downstream by consuming those events.

mod in_memory;
mod publisher;

pub use in_memory::InMemoryEventBus;
pub use publisher::EventPublisher;

// Re-export core event types for convenience
pub use rotor_core::TaskEvent;
