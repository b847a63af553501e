//! Section registry.
//!
//! The ordered, declarative table of application sections and the rule that
//! unlocks each one. The resolver evaluates these rules uniformly; adding a
//! section or changing its rule is a data change here, not a control-flow
//! change in the resolver.

use std::collections::BTreeSet;

use gw_common::{Module, PermissionKind, SectionId};

use super::catalog::PermissionCatalog;
use super::error::RegistryError;
use super::grouper::ModuleSet;

/// Unlocking rule for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Every authenticated user.
    Always,
    /// Administrators only. Administrators bypass rule evaluation, so for
    /// everyone else this never matches.
    AdministratorOnly,
    /// Any permission in any of the listed modules.
    AnyModule(&'static [Module]),
    /// The explicit permission kind, in whatever module it is stored.
    Kind(PermissionKind),
    /// The permission kind, held under the gate module. The same kind
    /// tagged with any other module does not count.
    GatedKind { gate: Module, kind: PermissionKind },
    /// Any of the nested rules.
    AnyOf(&'static [Rule]),
    /// Every nested rule.
    AllOf(&'static [Rule]),
}

impl Rule {
    /// Evaluate for a non-administrator.
    #[must_use]
    pub fn matches(&self, modules: &ModuleSet) -> bool {
        match self {
            Self::Always => true,
            Self::AdministratorOnly => false,
            Self::AnyModule(list) => list.iter().any(|m| modules.contains(*m)),
            Self::Kind(kind) => modules.has_kind(*kind),
            Self::GatedKind { gate, kind } => modules.has_kind_in(*gate, *kind),
            Self::AnyOf(rules) => rules.iter().any(|rule| rule.matches(modules)),
            Self::AllOf(rules) => rules.iter().all(|rule| rule.matches(modules)),
        }
    }

    fn collect_references(
        &self,
        module_refs: &mut BTreeSet<Module>,
        kind_refs: &mut BTreeSet<PermissionKind>,
    ) {
        match self {
            Self::Always => {}
            Self::AdministratorOnly => {
                module_refs.insert(Module::System);
            }
            Self::AnyModule(list) => module_refs.extend(list.iter().copied()),
            Self::Kind(kind) => {
                kind_refs.insert(*kind);
            }
            Self::GatedKind { gate, kind } => {
                module_refs.insert(*gate);
                kind_refs.insert(*kind);
            }
            Self::AnyOf(rules) | Self::AllOf(rules) => {
                for rule in *rules {
                    rule.collect_references(module_refs, kind_refs);
                }
            }
        }
    }
}

/// Whether a locked section stays in the navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Shown disabled when the rule does not match.
    Always,
    /// Removed from navigation when the rule does not match.
    WhenEnabled,
}

/// One registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDefinition {
    pub id: SectionId,
    pub rule: Rule,
    pub visibility: Visibility,
}

impl SectionDefinition {
    #[must_use]
    pub const fn new(id: SectionId, rule: Rule) -> Self {
        Self {
            id,
            rule,
            visibility: Visibility::Always,
        }
    }

    #[must_use]
    pub const fn hidden_when_locked(mut self) -> Self {
        self.visibility = Visibility::WhenEnabled;
        self
    }
}

const fn accounting(kind: PermissionKind) -> Rule {
    Rule::GatedKind {
        gate: Module::Accounting,
        kind,
    }
}

/// The application's sections in navigation order.
pub const STANDARD_SECTIONS: &[SectionDefinition] = &[
    SectionDefinition::new(SectionId::Dashboard, Rule::Always),
    SectionDefinition::new(SectionId::Settings, Rule::AdministratorOnly),
    SectionDefinition::new(SectionId::Users, Rule::AdministratorOnly),
    SectionDefinition::new(
        SectionId::Accounts,
        accounting(PermissionKind::ViewChartOfAccounts),
    ),
    SectionDefinition::new(SectionId::Customers, accounting(PermissionKind::ViewCustomers)),
    SectionDefinition::new(SectionId::Suppliers, accounting(PermissionKind::ViewSuppliers)),
    // Reachable from either the operations track or the aviation track.
    SectionDefinition::new(
        SectionId::Reservations,
        Rule::AnyModule(&[Module::Operations, Module::Aviation]),
    ),
    SectionDefinition::new(SectionId::Flights, Rule::AnyModule(&[Module::Aviation])),
    // "Operations" is a legacy alias of "Trips" in older seed data.
    SectionDefinition::new(
        SectionId::Trips,
        Rule::AnyModule(&[Module::Trips, Module::Operations]),
    ),
    SectionDefinition::new(SectionId::Umrah, Rule::AnyModule(&[Module::Umrah])),
    SectionDefinition::new(SectionId::Invoices, accounting(PermissionKind::ViewInvoices)),
    SectionDefinition::new(SectionId::CashBox, accounting(PermissionKind::ViewCashBox)),
    SectionDefinition::new(SectionId::Banks, accounting(PermissionKind::ViewBankAccounts)),
    SectionDefinition::new(
        SectionId::Journals,
        accounting(PermissionKind::ViewJournalEntries),
    ),
    SectionDefinition::new(SectionId::Reports, Rule::AnyModule(&[Module::Reports])),
    // The default catalog files ViewFinancialReports under Reports, so that
    // tag is accepted alongside Accounting. The Accounting gate still applies.
    SectionDefinition::new(
        SectionId::AccountingReports,
        Rule::AllOf(&[
            Rule::AnyModule(&[Module::Accounting]),
            Rule::AnyOf(&[
                accounting(PermissionKind::ViewFinancialReports),
                Rule::GatedKind {
                    gate: Module::Reports,
                    kind: PermissionKind::ViewFinancialReports,
                },
            ]),
        ]),
    ),
    // Trips and Operations are aliases here too.
    SectionDefinition::new(
        SectionId::Calculator,
        Rule::AnyOf(&[
            Rule::Kind(PermissionKind::UseCalculator),
            Rule::AnyModule(&[Module::Aviation, Module::Operations, Module::Trips]),
        ]),
    ),
];

/// Ordered set of section definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRegistry {
    sections: Vec<SectionDefinition>,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl SectionRegistry {
    /// The application's registry.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            sections: STANDARD_SECTIONS.to_vec(),
        }
    }

    /// A custom registry. Call [`Self::validate`] before serving with it.
    #[must_use]
    pub const fn new(sections: Vec<SectionDefinition>) -> Self {
        Self { sections }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionDefinition> {
        self.sections.iter()
    }

    #[must_use]
    pub fn get(&self, id: SectionId) -> Option<&SectionDefinition> {
        self.sections.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Check every module and permission kind the rules reference against
    /// the catalog. The first mismatch is returned.
    pub fn validate(&self, catalog: &PermissionCatalog) -> Result<(), RegistryError> {
        let mut seen = BTreeSet::new();
        for section in &self.sections {
            if !seen.insert(section.id) {
                return Err(RegistryError::DuplicateSection(section.id));
            }

            let mut module_refs = BTreeSet::new();
            let mut kind_refs = BTreeSet::new();
            section
                .rule
                .collect_references(&mut module_refs, &mut kind_refs);

            if let Some(module) = module_refs
                .into_iter()
                .find(|m| !catalog.contains_module(m.as_str()))
            {
                return Err(RegistryError::UnknownModule {
                    section: section.id,
                    module,
                });
            }

            if let Some(kind) = kind_refs.into_iter().find(|k| !catalog.contains_kind(*k)) {
                return Err(RegistryError::UnknownPermissionKind {
                    section: section.id,
                    kind,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SectionRegistry {
    type Item = &'a SectionDefinition;
    type IntoIter = std::slice::Iter<'a, SectionDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
