//! Capability resolution.
//!
//! Computes the per-section projection for a user from their grouped
//! permissions.
//!
//! Resolution order:
//! 1. Holding anything in the `System` module makes the user an
//!    administrator: every section is visible and enabled.
//! 2. Otherwise each section's rule is evaluated independently of every
//!    other section.
//! 3. A section whose rule does not match is shown disabled, or hidden when
//!    its definition says so.
//!
//! Role names are never consulted.

use std::collections::BTreeMap;

use gw_common::{CapabilityProjection, Module, ResolvedPermissionSet, SectionState};

use super::grouper::ModuleSet;
use super::registry::{SectionRegistry, Visibility};

/// Resolve a projection from grouped permissions.
#[must_use]
pub fn resolve_capabilities(
    modules: &ModuleSet,
    registry: &SectionRegistry,
) -> CapabilityProjection {
    // Administrator override
    if modules.contains(Module::System) {
        let sections = registry
            .iter()
            .map(|section| (section.id, SectionState::OPEN))
            .collect();
        return CapabilityProjection::new(true, sections);
    }

    let sections: BTreeMap<_, _> = registry
        .iter()
        .map(|section| {
            let state = if section.rule.matches(modules) {
                SectionState::OPEN
            } else {
                match section.visibility {
                    Visibility::Always => SectionState::LOCKED,
                    Visibility::WhenEnabled => SectionState::HIDDEN,
                }
            };
            (section.id, state)
        })
        .collect();

    CapabilityProjection::new(false, sections)
}

/// Group and resolve in one step.
///
/// Unknown module tags are logged; they never grant anything.
#[must_use]
pub fn resolve(
    permissions: &ResolvedPermissionSet,
    registry: &SectionRegistry,
) -> CapabilityProjection {
    let modules = ModuleSet::from_permissions(permissions);
    for tag in modules.unknown_tags() {
        tracing::warn!(module = tag, "Ignoring unknown module tag in permission set");
    }
    resolve_capabilities(&modules, registry)
}
