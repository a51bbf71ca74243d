//! ROTOR Engine - Assignee Selection and Task Routing
//!
//! The selection core of the workflow system:
//! - Group resolution against the host directory
//! - One `AssigneeSelector` per assignment strategy
//! - The startup-built `SelectorRegistry` dispatch table
//! - `AssignmentService`, which walks the configured strategy fallback
//!   chain, records pending/completed task state, and publishes lifecycle
//!   events
//!
//! Persistence (`rotor-storage`) and messaging (`rotor-events`) stay
//! behind traits; the engine holds no I/O of its own.

pub mod groups;
pub mod random;
pub mod registry;
pub mod selector;
pub mod service;
pub mod strategies;

pub use groups::{resolve_members, GroupDirectory, StaticGroupDirectory};
pub use random::{RandomSource, SeededRandom};
pub use registry::{SelectorRegistry, SelectorRegistryBuilder};
pub use selector::AssigneeSelector;
pub use service::AssignmentService;
pub use strategies::{
    ManualSelector, PreviousOwnerSelector, RandomSelector, RoundRobinSelector,
    SupervisorSelector, WorkloadSelector,
};

// Re-export the core types callers need alongside the engine
pub use rotor_core::{
    AssigneeSelectionResult, AssignmentContext, AssignmentStrategy, RotorError, RotorResult,
    RoutingConfig,
};
