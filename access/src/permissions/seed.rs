//! Default permission catalog and roles.
//!
//! Mirrors the data the desktop application seeds on first start. Used to
//! populate an empty database and as the in-memory catalog in tests.

use gw_common::{Permission, PermissionKind, Role};

/// Seed entry for one permission definition.
#[derive(Debug, Clone, Copy)]
pub struct SeedPermission {
    pub kind: PermissionKind,
    pub name: &'static str,
    pub category: &'static str,
    pub is_system: bool,
}

/// Seed entry for one role.
#[derive(Debug, Clone, Copy)]
pub struct SeedRole {
    pub name: &'static str,
    pub description: &'static str,
    /// `None` grants every permission in the catalog.
    pub kinds: Option<&'static [PermissionKind]>,
}

const fn perm(
    kind: PermissionKind,
    name: &'static str,
    category: &'static str,
) -> SeedPermission {
    SeedPermission {
        kind,
        name,
        category,
        is_system: false,
    }
}

const fn system_perm(
    kind: PermissionKind,
    name: &'static str,
    category: &'static str,
) -> SeedPermission {
    SeedPermission {
        kind,
        name,
        category,
        is_system: true,
    }
}

use PermissionKind as K;

/// Default catalog, in code order.
pub const DEFAULT_PERMISSIONS: &[SeedPermission] = &[
    perm(K::ViewTrips, "View trips", "Trips"),
    perm(K::CreateTrip, "Create trip", "Trips"),
    perm(K::EditTrip, "Edit trip", "Trips"),
    perm(K::DeleteTrip, "Delete trip", "Trips"),
    perm(K::CloseTrip, "Close trip", "Trips"),
    perm(K::ManageTripBookings, "Manage trip bookings", "Trips"),
    perm(K::ViewFlightBookings, "View flight bookings", "Aviation"),
    perm(K::CreateFlightBooking, "Create flight booking", "Aviation"),
    perm(K::EditFlightBooking, "Edit flight booking", "Aviation"),
    perm(K::DeleteFlightBooking, "Delete flight booking", "Aviation"),
    perm(K::ManageFlightPayments, "Manage flight payments", "Aviation"),
    perm(K::ViewUmrahPackages, "View umrah packages", "Umrah"),
    perm(K::CreateUmrahPackage, "Create umrah package", "Umrah"),
    perm(K::EditUmrahPackage, "Edit umrah package", "Umrah"),
    perm(K::DeleteUmrahPackage, "Delete umrah package", "Umrah"),
    perm(K::ViewUmrahTrips, "View umrah trips", "Umrah"),
    perm(K::CreateUmrahTrip, "Create umrah trip", "Umrah"),
    perm(K::EditUmrahTrip, "Edit umrah trip", "Umrah"),
    perm(K::DeleteUmrahTrip, "Delete umrah trip", "Umrah"),
    perm(K::ManageUmrahPilgrims, "Manage pilgrims", "Umrah"),
    perm(K::ManageUmrahPayments, "Manage umrah payments", "Umrah"),
    perm(K::UseCalculator, "Use calculator", "Tools"),
    perm(K::ViewCustomers, "View customers", "Customers"),
    perm(K::CreateCustomer, "Create customer", "Customers"),
    perm(K::EditCustomer, "Edit customer", "Customers"),
    perm(K::DeleteCustomer, "Delete customer", "Customers"),
    perm(K::ViewCustomerStatement, "View customer statement", "Customers"),
    perm(K::ViewSuppliers, "View suppliers", "Suppliers"),
    perm(K::CreateSupplier, "Create supplier", "Suppliers"),
    perm(K::EditSupplier, "Edit supplier", "Suppliers"),
    perm(K::DeleteSupplier, "Delete supplier", "Suppliers"),
    perm(K::ViewSupplierStatement, "View supplier statement", "Suppliers"),
    perm(K::ViewInvoices, "View invoices", "Invoices"),
    perm(K::CreateSalesInvoice, "Create sales invoice", "Invoices"),
    perm(K::EditSalesInvoice, "Edit sales invoice", "Invoices"),
    perm(K::DeleteSalesInvoice, "Delete sales invoice", "Invoices"),
    perm(K::CreatePurchaseInvoice, "Create purchase invoice", "Invoices"),
    perm(K::EditPurchaseInvoice, "Edit purchase invoice", "Invoices"),
    perm(K::DeletePurchaseInvoice, "Delete purchase invoice", "Invoices"),
    perm(K::ApproveInvoice, "Approve invoice", "Invoices"),
    perm(K::ViewReservations, "View reservations", "Reservations"),
    perm(K::CreateReservation, "Create reservation", "Reservations"),
    perm(K::EditReservation, "Edit reservation", "Reservations"),
    perm(K::DeleteReservation, "Delete reservation", "Reservations"),
    perm(K::ViewCashBox, "View cash box", "Cash"),
    perm(K::CreateCashTransaction, "Create cash transaction", "Cash"),
    perm(K::EditCashTransaction, "Edit cash transaction", "Cash"),
    perm(K::DeleteCashTransaction, "Delete cash transaction", "Cash"),
    perm(K::ViewBankAccounts, "View bank accounts", "Bank"),
    perm(K::CreateBankTransaction, "Create bank transaction", "Bank"),
    perm(K::EditBankTransaction, "Edit bank transaction", "Bank"),
    perm(K::DeleteBankTransaction, "Delete bank transaction", "Bank"),
    perm(K::ManageBankTransfers, "Manage bank transfers", "Bank"),
    perm(K::ViewJournalEntries, "View journal entries", "Journal"),
    perm(K::CreateJournalEntry, "Create journal entry", "Journal"),
    perm(K::EditJournalEntry, "Edit journal entry", "Journal"),
    perm(K::DeleteJournalEntry, "Delete journal entry", "Journal"),
    system_perm(K::EditClosedPeriod, "Edit closed period", "Journal"),
    perm(K::ViewChartOfAccounts, "View chart of accounts", "Accounts"),
    perm(K::CreateAccount, "Create account", "Accounts"),
    perm(K::EditAccount, "Edit account", "Accounts"),
    perm(K::DeleteAccount, "Delete account", "Accounts"),
    perm(K::ViewReports, "View reports", "Reports"),
    perm(K::ViewFinancialReports, "View financial reports", "Reports"),
    perm(K::ViewTrialBalance, "View trial balance", "Reports"),
    perm(K::ViewIncomeStatement, "View income statement", "Reports"),
    perm(K::ViewBalanceSheet, "View balance sheet", "Reports"),
    perm(K::ViewCashFlowStatement, "View cash flow statement", "Reports"),
    perm(K::ViewTripReports, "View trip reports", "Reports"),
    perm(K::ViewFlightReports, "View flight reports", "Reports"),
    perm(K::ViewUmrahReports, "View umrah reports", "Reports"),
    system_perm(K::ViewProfitMargins, "View profit margins", "Reports"),
    perm(K::ExportReports, "Export reports", "Reports"),
    perm(K::PrintReports, "Print reports", "Reports"),
    perm(K::ViewSettings, "View settings", "Settings"),
    system_perm(K::EditCompanySettings, "Edit company settings", "Settings"),
    perm(K::EditInvoiceSettings, "Edit invoice settings", "Settings"),
    system_perm(K::EditFiscalYearSettings, "Edit fiscal year settings", "Settings"),
    perm(K::ManageCurrencies, "Manage currencies", "Settings"),
    perm(K::ManageServiceTypes, "Manage service types", "Settings"),
    system_perm(K::ManageUsers, "Manage users", "Administration"),
    system_perm(K::ManageRoles, "Manage roles", "Administration"),
    system_perm(K::ManagePermissions, "Manage permissions", "Administration"),
    system_perm(K::ViewAuditLogs, "View audit logs", "Administration"),
    system_perm(K::ViewSystemLogs, "View system logs", "Administration"),
    system_perm(K::BackupDatabase, "Backup database", "Administration"),
    system_perm(K::RestoreDatabase, "Restore database", "Administration"),
    system_perm(K::ManageSessions, "Manage sessions", "Administration"),
];

const OPERATIONS_KINDS: &[PermissionKind] = &[
    K::ViewTrips,
    K::CreateTrip,
    K::EditTrip,
    K::DeleteTrip,
    K::CloseTrip,
    K::ManageTripBookings,
    K::UseCalculator,
    K::ViewReports,
    K::ViewTripReports,
    K::ExportReports,
    K::PrintReports,
];

const AVIATION_UMRAH_KINDS: &[PermissionKind] = &[
    K::ViewFlightBookings,
    K::CreateFlightBooking,
    K::EditFlightBooking,
    K::DeleteFlightBooking,
    K::ManageFlightPayments,
    K::ViewUmrahPackages,
    K::CreateUmrahPackage,
    K::EditUmrahPackage,
    K::DeleteUmrahPackage,
    K::ViewUmrahTrips,
    K::CreateUmrahTrip,
    K::EditUmrahTrip,
    K::DeleteUmrahTrip,
    K::ManageUmrahPilgrims,
    K::ManageUmrahPayments,
    K::UseCalculator,
    K::ViewReports,
    K::ViewFlightReports,
    K::ViewUmrahReports,
    K::ExportReports,
    K::PrintReports,
];

pub const OPERATIONS_ROLE: &str = "Operations Department";
pub const AVIATION_UMRAH_ROLE: &str = "Aviation and Umrah";
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Default roles.
pub const DEFAULT_ROLES: &[SeedRole] = &[
    SeedRole {
        name: OPERATIONS_ROLE,
        description: "Operations department: trips and calculator",
        kinds: Some(OPERATIONS_KINDS),
    },
    SeedRole {
        name: AVIATION_UMRAH_ROLE,
        description: "Aviation and umrah department: flights, umrah and calculator",
        kinds: Some(AVIATION_UMRAH_KINDS),
    },
    SeedRole {
        name: ADMINISTRATOR_ROLE,
        description: "Administrator: full access to every section",
        kinds: None,
    },
];

impl SeedRole {
    /// Whether this role is granted `kind`.
    #[must_use]
    pub fn grants(&self, kind: PermissionKind) -> bool {
        self.kinds.is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Default catalog as permission records.
///
/// Ids are assigned in catalog order starting at 1, matching a freshly
/// seeded database.
#[must_use]
pub fn default_permissions() -> Vec<Permission> {
    DEFAULT_PERMISSIONS
        .iter()
        .zip(1..)
        .map(|(seed, id)| Permission {
            id,
            kind: seed.kind,
            name: seed.name.to_string(),
            module: seed.kind.default_module().as_str().to_string(),
            is_system: seed.is_system,
        })
        .collect()
}

/// Default roles as role records, ids starting at 1.
#[must_use]
pub fn default_roles() -> Vec<Role> {
    DEFAULT_ROLES
        .iter()
        .zip(1..)
        .map(|(seed, id)| Role {
            id,
            name: seed.name.to_string(),
            description: Some(seed.description.to_string()),
        })
        .collect()
}
