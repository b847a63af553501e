//! Permission catalog index.
//!
//! In-memory view of the `permissions` table. The section registry is
//! validated against it at startup.

use std::collections::{BTreeMap, BTreeSet};

use gw_common::{Permission, PermissionKind};

use super::seed;

/// Indexed set of permission definitions.
#[derive(Debug, Clone, Default)]
pub struct PermissionCatalog {
    by_id: BTreeMap<i32, Permission>,
    by_kind: BTreeMap<PermissionKind, i32>,
    modules: BTreeSet<String>,
}

impl PermissionCatalog {
    /// Index a list of definitions.
    ///
    /// A repeated id keeps the last definition. When several ids share a
    /// kind, the lowest id is the canonical one.
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let mut by_id = BTreeMap::new();
        for permission in permissions {
            if let Some(previous) = by_id.insert(permission.id, permission) {
                tracing::warn!(
                    permission_id = previous.id,
                    "Duplicate permission id in catalog"
                );
            }
        }

        let mut by_kind = BTreeMap::new();
        let mut modules = BTreeSet::new();
        for permission in by_id.values() {
            by_kind.entry(permission.kind).or_insert(permission.id);
            modules.insert(permission.module.clone());
        }

        Self {
            by_id,
            by_kind,
            modules,
        }
    }

    /// Catalog matching a freshly seeded database.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed::default_permissions())
    }

    #[must_use]
    pub fn get(&self, id: i32) -> Option<&Permission> {
        self.by_id.get(&id)
    }

    /// Canonical definition for a kind.
    #[must_use]
    pub fn by_kind(&self, kind: PermissionKind) -> Option<&Permission> {
        self.by_kind.get(&kind).and_then(|id| self.by_id.get(id))
    }

    #[must_use]
    pub fn contains_kind(&self, kind: PermissionKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// Whether any definition carries this exact module tag.
    #[must_use]
    pub fn contains_module(&self, tag: &str) -> bool {
        self.modules.contains(tag)
    }

    /// Module tags present in the catalog.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.by_id.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
