//! Section Types
//!
//! Navigable areas of the desktop client and the per-session projection
//! describing which of them are shown and usable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Application section identifier.
///
/// Declaration order is navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Dashboard,
    Settings,
    Users,
    Accounts,
    Customers,
    Suppliers,
    Reservations,
    Flights,
    Trips,
    Umrah,
    Invoices,
    #[serde(rename = "cashbox")]
    CashBox,
    Banks,
    Journals,
    Reports,
    AccountingReports,
    Calculator,
}

impl SectionId {
    /// Stable string identifier, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Settings => "settings",
            Self::Users => "users",
            Self::Accounts => "accounts",
            Self::Customers => "customers",
            Self::Suppliers => "suppliers",
            Self::Reservations => "reservations",
            Self::Flights => "flights",
            Self::Trips => "trips",
            Self::Umrah => "umrah",
            Self::Invoices => "invoices",
            Self::CashBox => "cashbox",
            Self::Banks => "banks",
            Self::Journals => "journals",
            Self::Reports => "reports",
            Self::AccountingReports => "accounting_reports",
            Self::Calculator => "calculator",
        }
    }

    /// Human-readable title used in notices.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Settings => "Settings",
            Self::Users => "User Management",
            Self::Accounts => "Chart of Accounts",
            Self::Customers => "Customers",
            Self::Suppliers => "Suppliers",
            Self::Reservations => "Reservations",
            Self::Flights => "Flights",
            Self::Trips => "Trips",
            Self::Umrah => "Umrah",
            Self::Invoices => "Invoices",
            Self::CashBox => "Cash Box",
            Self::Banks => "Banks",
            Self::Journals => "Journal Entries",
            Self::Reports => "Reports",
            Self::AccountingReports => "Accounting Reports",
            Self::Calculator => "Calculator",
        }
    }

    /// Every section in navigation order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Dashboard,
            Self::Settings,
            Self::Users,
            Self::Accounts,
            Self::Customers,
            Self::Suppliers,
            Self::Reservations,
            Self::Flights,
            Self::Trips,
            Self::Umrah,
            Self::Invoices,
            Self::CashBox,
            Self::Banks,
            Self::Journals,
            Self::Reports,
            Self::AccountingReports,
            Self::Calculator,
        ]
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SectionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnknownSection(s.to_string()))
    }
}

/// Visibility and usability of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionState {
    /// Shown in navigation.
    pub visible: bool,
    /// Interactive.
    pub enabled: bool,
}

impl SectionState {
    pub const OPEN: Self = Self {
        visible: true,
        enabled: true,
    };

    /// Shown but inert; the client explains why when clicked.
    pub const LOCKED: Self = Self {
        visible: true,
        enabled: false,
    };

    pub const HIDDEN: Self = Self {
        visible: false,
        enabled: false,
    };
}

/// Immutable per-session projection of section states.
///
/// Sections are kept in navigation order so two projections built from the
/// same input serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityProjection {
    pub is_administrator: bool,
    pub sections: BTreeMap<SectionId, SectionState>,
}

impl CapabilityProjection {
    #[must_use]
    pub const fn new(is_administrator: bool, sections: BTreeMap<SectionId, SectionState>) -> Self {
        Self {
            is_administrator,
            sections,
        }
    }

    /// State of a section. Sections absent from the projection are hidden.
    #[must_use]
    pub fn state(&self, section: SectionId) -> SectionState {
        self.sections
            .get(&section)
            .copied()
            .unwrap_or(SectionState::HIDDEN)
    }

    #[must_use]
    pub fn is_enabled(&self, section: SectionId) -> bool {
        self.state(section).enabled
    }

    #[must_use]
    pub fn is_visible(&self, section: SectionId) -> bool {
        self.state(section).visible
    }

    /// Gate for opening a section.
    ///
    /// The error's display text is the notice shown to the user.
    pub fn require_enabled(&self, section: SectionId) -> Result<()> {
        if self.is_enabled(section) {
            Ok(())
        } else {
            Err(Error::InsufficientPermission { section })
        }
    }

    /// Enabled sections in navigation order.
    pub fn enabled_sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections
            .iter()
            .filter(|(_, state)| state.enabled)
            .map(|(id, _)| *id)
    }

    /// Visible sections in navigation order.
    pub fn visible_sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections
            .iter()
            .filter(|(_, state)| state.visible)
            .map(|(id, _)| *id)
    }
}
