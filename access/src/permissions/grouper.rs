//! Module grouping.
//!
//! Turns a user's resolved permission set into a per-module index. Pure; the
//! result is rebuilt on every resolution.

use std::collections::{BTreeMap, BTreeSet};

use gw_common::{Module, PermissionKind, ResolvedPermissionSet};

/// Permissions a user holds, grouped by module tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSet {
    modules: BTreeMap<String, BTreeSet<PermissionKind>>,
    kinds: BTreeSet<PermissionKind>,
    distinct_permissions: usize,
}

impl ModuleSet {
    /// Group a resolved permission set.
    ///
    /// Entries sharing a permission id are counted once; the first occurrence
    /// wins. Module tags are kept verbatim, known or not.
    #[must_use]
    pub fn from_permissions(permissions: &ResolvedPermissionSet) -> Self {
        let mut seen = BTreeSet::new();
        let mut modules: BTreeMap<String, BTreeSet<PermissionKind>> = BTreeMap::new();
        let mut kinds = BTreeSet::new();

        for permission in permissions {
            if !seen.insert(permission.id) {
                continue;
            }
            modules
                .entry(permission.module.clone())
                .or_default()
                .insert(permission.kind);
            kinds.insert(permission.kind);
        }

        Self {
            modules,
            kinds,
            distinct_permissions: seen.len(),
        }
    }

    /// Whether the user holds any permission in `module`.
    #[must_use]
    pub fn contains(&self, module: Module) -> bool {
        self.contains_tag(module.as_str())
    }

    /// Exact, case-sensitive tag lookup.
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.modules.contains_key(tag)
    }

    /// Whether the user holds `kind` under `module`.
    #[must_use]
    pub fn has_kind_in(&self, module: Module, kind: PermissionKind) -> bool {
        self.modules
            .get(module.as_str())
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Whether the user holds `kind` under any module.
    #[must_use]
    pub fn has_kind(&self, kind: PermissionKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Kinds held under a module tag.
    #[must_use]
    pub fn kinds_in(&self, tag: &str) -> Option<&BTreeSet<PermissionKind>> {
        self.modules.get(tag)
    }

    /// Module tags held by the user.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Tags outside the known vocabulary. They unlock nothing.
    pub fn unknown_tags(&self) -> impl Iterator<Item = &str> {
        self.tags().filter(|tag| Module::from_tag(tag).is_none())
    }

    /// Number of distinct permission ids grouped.
    #[must_use]
    pub const fn distinct_permissions(&self) -> usize {
        self.distinct_permissions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Grouping as a plain map, as exposed to callers.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, Vec<PermissionKind>> {
        self.modules
            .iter()
            .map(|(tag, kinds)| (tag.clone(), kinds.iter().copied().collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use gw_common::Permission;

    use super::*;

    fn set(perms: Vec<Permission>) -> ResolvedPermissionSet {
        ResolvedPermissionSet::new(perms)
    }

    #[test]
    fn test_empty_set() {
        let modules = ModuleSet::from_permissions(&ResolvedPermissionSet::empty());
        assert!(modules.is_empty());
        assert_eq!(modules.distinct_permissions(), 0);
        assert!(!modules.contains(Module::System));
    }

    #[test]
    fn test_groups_by_module() {
        let modules = ModuleSet::from_permissions(&set(vec![
            Permission::new(1, PermissionKind::ViewTrips),
            Permission::new(2, PermissionKind::CreateTrip),
            Permission::new(30, PermissionKind::UseCalculator),
        ]));
        assert!(modules.contains(Module::Trips));
        assert!(modules.contains(Module::Calculator));
        assert!(!modules.contains(Module::Aviation));
        assert_eq!(modules.kinds_in("Trips").map(BTreeSet::len), Some(2));
    }

    #[test]
    fn test_duplicates_counted_once() {
        let modules = ModuleSet::from_permissions(&set(vec![
            Permission::new(1, PermissionKind::ViewTrips),
            Permission::new(1, PermissionKind::ViewTrips),
            Permission::new(2, PermissionKind::CreateTrip),
        ]));
        assert_eq!(modules.distinct_permissions(), 2);
        assert_eq!(modules.kinds_in("Trips").map(BTreeSet::len), Some(2));
    }

    #[test]
    fn test_first_occurrence_of_id_wins() {
        let modules = ModuleSet::from_permissions(&set(vec![
            Permission::new(5, PermissionKind::ViewTrips),
            Permission::new(5, PermissionKind::ViewTrips).in_module("Operations"),
        ]));
        assert!(modules.contains(Module::Trips));
        assert!(!modules.contains(Module::Operations));
    }

    #[test]
    fn test_tag_match_is_exact() {
        let modules = ModuleSet::from_permissions(&set(vec![
            Permission::new(1, PermissionKind::ViewTrips).in_module("trips"),
        ]));
        assert!(!modules.contains(Module::Trips));
        assert!(modules.contains_tag("trips"));
        assert_eq!(modules.unknown_tags().collect::<Vec<_>>(), vec!["trips"]);
    }

    #[test]
    fn test_kind_lookup_scoped_by_module() {
        let modules = ModuleSet::from_permissions(&set(vec![
            Permission::new(80, PermissionKind::ViewCashBox),
            Permission::new(111, PermissionKind::ViewFinancialReports),
        ]));
        assert!(modules.has_kind_in(Module::Accounting, PermissionKind::ViewCashBox));
        assert!(!modules.has_kind_in(Module::Accounting, PermissionKind::ViewFinancialReports));
        assert!(modules.has_kind(PermissionKind::ViewFinancialReports));
        assert!(!modules.has_kind(PermissionKind::ViewCustomers));
    }

    #[test]
    fn test_unknown_tag_preserved_in_map() {
        let modules = ModuleSet::from_permissions(&set(vec![
            Permission::new(1, PermissionKind::ViewTrips).in_module("Marketing"),
            Permission::new(2, PermissionKind::ViewReports),
        ]));
        let map = modules.to_map();
        assert_eq!(map.get("Marketing"), Some(&vec![PermissionKind::ViewTrips]));
        assert_eq!(map.get("Reports"), Some(&vec![PermissionKind::ViewReports]));
    }
}
