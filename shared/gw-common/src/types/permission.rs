//! Permission Types
//!
//! Permission kinds are stored as integer codes in the `permissions` table
//! (`PermissionType` column). The codes below are stable and must never be
//! renumbered.

use serde::{Deserialize, Serialize};

macro_rules! permission_kinds {
    ($($(#[$meta:meta])* $variant:ident = $code:literal => $module:ident,)+) => {
        /// Fine-grained capability within a module.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[repr(i32)]
        pub enum PermissionKind {
            $($(#[$meta])* $variant = $code,)+
        }

        impl PermissionKind {
            /// Stored integer code.
            #[must_use]
            pub const fn code(self) -> i32 {
                self as i32
            }

            /// Parse a stored integer code.
            ///
            /// Returns `None` for codes this build does not know about.
            #[must_use]
            pub const fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Module this kind is seeded under in the default catalog.
            #[must_use]
            pub const fn default_module(self) -> Module {
                match self {
                    $(Self::$variant => Module::$module,)+
                }
            }

            /// Variant name as stored in seed data and logs (e.g. `ViewCustomers`).
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }

            /// Every permission kind, ordered by code.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                &[$(Self::$variant,)+]
            }
        }
    };
}

permission_kinds! {
    // Trips
    ViewTrips = 1 => Trips,
    CreateTrip = 2 => Trips,
    EditTrip = 3 => Trips,
    DeleteTrip = 4 => Trips,
    CloseTrip = 5 => Trips,
    ManageTripBookings = 6 => Trips,

    // Aviation
    ViewFlightBookings = 10 => Aviation,
    CreateFlightBooking = 11 => Aviation,
    EditFlightBooking = 12 => Aviation,
    DeleteFlightBooking = 13 => Aviation,
    ManageFlightPayments = 14 => Aviation,

    // Umrah
    ViewUmrahPackages = 20 => Umrah,
    CreateUmrahPackage = 21 => Umrah,
    EditUmrahPackage = 22 => Umrah,
    DeleteUmrahPackage = 23 => Umrah,
    ViewUmrahTrips = 24 => Umrah,
    CreateUmrahTrip = 25 => Umrah,
    EditUmrahTrip = 26 => Umrah,
    DeleteUmrahTrip = 27 => Umrah,
    ManageUmrahPilgrims = 28 => Umrah,
    ManageUmrahPayments = 29 => Umrah,

    /// Direct grant of the accounting calculator.
    UseCalculator = 30 => Calculator,

    // Customers
    ViewCustomers = 40 => Accounting,
    CreateCustomer = 41 => Accounting,
    EditCustomer = 42 => Accounting,
    DeleteCustomer = 43 => Accounting,
    ViewCustomerStatement = 44 => Accounting,

    // Suppliers
    ViewSuppliers = 50 => Accounting,
    CreateSupplier = 51 => Accounting,
    EditSupplier = 52 => Accounting,
    DeleteSupplier = 53 => Accounting,
    ViewSupplierStatement = 54 => Accounting,

    // Invoices
    ViewInvoices = 60 => Accounting,
    CreateSalesInvoice = 61 => Accounting,
    EditSalesInvoice = 62 => Accounting,
    DeleteSalesInvoice = 63 => Accounting,
    CreatePurchaseInvoice = 64 => Accounting,
    EditPurchaseInvoice = 65 => Accounting,
    DeletePurchaseInvoice = 66 => Accounting,
    ApproveInvoice = 67 => Accounting,

    // Reservations
    ViewReservations = 70 => Operations,
    CreateReservation = 71 => Operations,
    EditReservation = 72 => Operations,
    DeleteReservation = 73 => Operations,

    // Cash and banks
    ViewCashBox = 80 => Accounting,
    CreateCashTransaction = 81 => Accounting,
    EditCashTransaction = 82 => Accounting,
    DeleteCashTransaction = 83 => Accounting,
    ViewBankAccounts = 84 => Accounting,
    CreateBankTransaction = 85 => Accounting,
    EditBankTransaction = 86 => Accounting,
    DeleteBankTransaction = 87 => Accounting,
    ManageBankTransfers = 88 => Accounting,

    // Journal entries
    ViewJournalEntries = 90 => Accounting,
    CreateJournalEntry = 91 => Accounting,
    EditJournalEntry = 92 => Accounting,
    DeleteJournalEntry = 93 => Accounting,
    EditClosedPeriod = 94 => Accounting,

    // Chart of accounts
    ViewChartOfAccounts = 100 => Accounting,
    CreateAccount = 101 => Accounting,
    EditAccount = 102 => Accounting,
    DeleteAccount = 103 => Accounting,

    // Reports
    ViewReports = 110 => Reports,
    ViewFinancialReports = 111 => Reports,
    ViewTrialBalance = 112 => Reports,
    ViewIncomeStatement = 113 => Reports,
    ViewBalanceSheet = 114 => Reports,
    ViewCashFlowStatement = 115 => Reports,
    ViewTripReports = 116 => Reports,
    ViewFlightReports = 117 => Reports,
    ViewUmrahReports = 118 => Reports,
    ViewProfitMargins = 119 => Reports,
    ExportReports = 120 => Reports,
    PrintReports = 121 => Reports,

    // Settings
    ViewSettings = 130 => System,
    EditCompanySettings = 131 => System,
    EditInvoiceSettings = 132 => System,
    EditFiscalYearSettings = 133 => System,
    ManageCurrencies = 134 => System,
    ManageServiceTypes = 135 => System,

    // Administration
    ManageUsers = 140 => System,
    ManageRoles = 141 => System,
    ManagePermissions = 142 => System,
    ViewAuditLogs = 143 => System,
    ViewSystemLogs = 144 => System,
    BackupDatabase = 145 => System,
    RestoreDatabase = 146 => System,
    ManageSessions = 147 => System,
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known module vocabulary.
///
/// Module tags are compared exactly and case-sensitively. Tags outside this
/// vocabulary are legal in stored data but unlock nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Module {
    /// Administration. Holding any permission here makes the user an administrator.
    System,
    Trips,
    /// Legacy alias of `Trips` used by some seed data; also owns reservations.
    Operations,
    Aviation,
    Umrah,
    Reports,
    Accounting,
    Calculator,
    /// Alternate tag some seed data uses for the calculator.
    Tools,
}

impl Module {
    /// Stored tag for this module.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Trips => "Trips",
            Self::Operations => "Operations",
            Self::Aviation => "Aviation",
            Self::Umrah => "Umrah",
            Self::Reports => "Reports",
            Self::Accounting => "Accounting",
            Self::Calculator => "Calculator",
            Self::Tools => "Tools",
        }
    }

    /// Parse a stored tag. Exact match only: `"trips"` is not `Trips`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.as_str() == tag)
    }

    /// Every known module.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::System,
            Self::Trips,
            Self::Operations,
            Self::Aviation,
            Self::Umrah,
            Self::Reports,
            Self::Accounting,
            Self::Calculator,
            Self::Tools,
        ]
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A permission definition as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Stable identity (`permissionid`).
    pub id: i32,
    /// Permission kind.
    pub kind: PermissionKind,
    /// Display name.
    pub name: String,
    /// Module tag, kept verbatim from storage.
    pub module: String,
    /// Reserved for administrator-only capabilities.
    pub is_system: bool,
}

impl Permission {
    /// Build a permission in its default module.
    #[must_use]
    pub fn new(id: i32, kind: PermissionKind) -> Self {
        Self {
            id,
            kind,
            name: kind.as_str().to_string(),
            module: kind.default_module().as_str().to_string(),
            is_system: false,
        }
    }

    /// Override the module tag.
    #[must_use]
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Known module this permission belongs to, if any.
    #[must_use]
    pub fn known_module(&self) -> Option<Module> {
        Module::from_tag(&self.module)
    }
}

/// Permissions reachable through a user's role for one session.
///
/// May contain duplicates; consumers deduplicate by permission id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedPermissionSet {
    permissions: Vec<Permission>,
}

impl ResolvedPermissionSet {
    /// Wrap an already-fetched list.
    #[must_use]
    pub const fn new(permissions: Vec<Permission>) -> Self {
        Self { permissions }
    }

    /// The set for a user with no role.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            permissions: Vec::new(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Permission> {
        self.permissions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<Permission> for ResolvedPermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResolvedPermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::slice::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}

/// Role record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// User record, restricted to the fields access control reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// `None` means no role and therefore no permissions.
    pub role_id: Option<i32>,
    pub is_active: bool,
}
