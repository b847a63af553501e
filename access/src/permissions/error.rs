//! Access Control Error Types

use gw_common::{Module, PermissionKind, SectionId};

/// Section registry does not match the permission catalog.
///
/// Always fatal at startup: it means the build and the seed data disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Section {section} requires permission kind {kind}, which is not in the catalog")]
    UnknownPermissionKind {
        section: SectionId,
        kind: PermissionKind,
    },

    #[error("Section {section} requires module {module}, which has no permissions in the catalog")]
    UnknownModule { section: SectionId, module: Module },

    #[error("Section {0} is registered more than once")]
    DuplicateSection(SectionId),
}

/// Errors raised while serving access decisions.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Invalid section registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("Permission catalog is empty")]
    EmptyCatalog,

    #[error("Role {0} not found")]
    RoleNotFound(i32),

    #[error("Permission {0} not found")]
    PermissionNotFound(i32),

    #[error("User {0} not found")]
    UserNotFound(i32),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
