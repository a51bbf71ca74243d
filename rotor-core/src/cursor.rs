//! Persisted round-robin cursor state.
//!
//! One cursor exists per `(activity_name, group_key)` pair. The cursor
//! records the index last assigned within the group's member list and a
//! version used for optimistic concurrency at the store boundary: a write
//! carries the version the writer read, and the store rejects it when the
//! row has moved on (`StoreError::VersionConflict`).

use serde::{Deserialize, Serialize};

/// Persisted last-assigned position for one `(activity, group)` rotation.
///
/// Created on the first round-robin assignment for its key, advanced modulo
/// member count on every subsequent one, and never deleted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoundRobinCursor {
    /// Workflow step this rotation belongs to
    pub activity_name: String,
    /// Group whose members are being rotated through
    pub group_key: String,
    /// Index of the member assigned last
    pub last_index: usize,
    /// Optimistic-concurrency version, bumped by the store on every write
    pub version: u64,
}

impl RoundRobinCursor {
    /// Create a fresh cursor positioned at `first_index`.
    pub fn new(
        activity_name: impl Into<String>,
        group_key: impl Into<String>,
        first_index: usize,
    ) -> Self {
        Self {
            activity_name: activity_name.into(),
            group_key: group_key.into(),
            last_index: first_index,
            version: 0,
        }
    }

    /// The last-assigned index clamped into `[0, member_count - 1]`.
    ///
    /// Membership may have shrunk since the last write; the stored index is
    /// clamped on read so rotation stays within the current list.
    pub fn clamped_index(&self, member_count: usize) -> usize {
        debug_assert!(member_count > 0);
        self.last_index.min(member_count.saturating_sub(1))
    }

    /// The index that the next assignment should use.
    pub fn next_index(&self, member_count: usize) -> usize {
        (self.clamped_index(member_count) + 1) % member_count
    }

    /// Advance the cursor to `next` in place.
    pub fn advance_to(&mut self, next: usize) {
        self.last_index = next;
    }
}

// =============================================================================
// TESTS
// =============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// For any stored index and any non-empty membership, the next index
        /// stays within bounds.
        #[test]
        fn prop_next_index_in_bounds(last in 0usize..10_000, count in 1usize..100) {
            let cursor = RoundRobinCursor {
                activity_name: "Review".to_string(),
                group_key: "g".to_string(),
                last_index: last,
                version: 0,
            };
            prop_assert!(cursor.next_index(count) < count);
        }

        /// Advancing `count` times from any starting point visits every
        /// index exactly once (the cycle property at the cursor level).
        #[test]
        fn prop_full_cycle_visits_all(start in 0usize..100, count in 1usize..32) {
            let mut cursor = RoundRobinCursor {
                activity_name: "Review".to_string(),
                group_key: "g".to_string(),
                last_index: start,
                version: 0,
            };
            let mut seen = vec![false; count];
            for _ in 0..count {
                let next = cursor.next_index(count);
                prop_assert!(!seen[next]);
                seen[next] = true;
                cursor.advance_to(next);
            }
            prop_assert!(seen.into_iter().all(|v| v));
        }
    }
}
