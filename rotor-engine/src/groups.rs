//! User group resolution.
//!
//! Groups are membership lists owned by the host application's directory.
//! The engine only needs to resolve names to member codes in stable
//! configured order; round-robin fairness depends on that order never
//! being re-sorted here.

use ::async_trait::async_trait;
use rotor_core::{RotorResult, UserCode};
use std::collections::{HashMap, HashSet};

/// Trait for the user-directory boundary.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Member user codes of a group, in the directory's configured order.
    ///
    /// An unknown group resolves to an empty list; callers treat both the
    /// same way (no candidates).
    async fn members(&self, group: &str) -> RotorResult<Vec<UserCode>>;
}

/// Resolve a list of groups to a de-duplicated member pool.
///
/// Members keep first-occurrence order across groups: a user appearing in
/// several groups counts once, at the position of their first appearance.
pub async fn resolve_members(
    directory: &dyn GroupDirectory,
    groups: &[String],
) -> RotorResult<Vec<UserCode>> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();
    for group in groups {
        for member in directory.members(group).await? {
            if seen.insert(member.clone()) {
                pool.push(member);
            }
        }
    }
    Ok(pool)
}

// ============================================================================
// STATIC DIRECTORY
// ============================================================================

/// Config-backed directory with fixed membership.
///
/// Used in tests and by embedders whose group membership comes from
/// configuration rather than an external directory service.
#[derive(Debug, Default, Clone)]
pub struct StaticGroupDirectory {
    groups: HashMap<String, Vec<UserCode>>,
}

impl StaticGroupDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group and its members (builder-style).
    pub fn with_group(
        mut self,
        name: impl Into<String>,
        members: Vec<impl Into<UserCode>>,
    ) -> Self {
        self.groups.insert(
            name.into(),
            members.into_iter().map(Into::into).collect(),
        );
        self
    }
}

#[async_trait]
impl GroupDirectory for StaticGroupDirectory {
    async fn members(&self, group: &str) -> RotorResult<Vec<UserCode>> {
        Ok(self.groups.get(group).cloned().unwrap_or_default())
    }
}

// =============================================================================
// TESTS
// =============================================================================
