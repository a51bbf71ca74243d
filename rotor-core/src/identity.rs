//! Identity types for ROTOR entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, making IDs naturally sortable by creation time.
pub type EntityId = Uuid;

/// Identifier tying a workflow instance's tasks and events together.
pub type CorrelationId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Externally issued user identifier (directory code, not a UUID).
pub type UserCode = String;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Generate a new workflow correlation id.
pub fn new_correlation_id() -> CorrelationId {
    Uuid::now_v7()
}
