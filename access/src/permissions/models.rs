//! Database Models
//!
//! Row types for the `users`, `roles` and `permissions` tables. Column names
//! are aliased in the queries so the rows stay independent of the legacy
//! mixed-case schema.

use gw_common::{Permission, PermissionKind, User};
use sqlx::FromRow;

/// Permission definition row.
#[derive(Debug, Clone, FromRow)]
pub struct PermissionRow {
    pub id: i32,
    pub kind_code: i32,
    pub name: String,
    pub module: String,
    pub is_system: bool,
}

impl PermissionRow {
    /// Convert to a domain permission.
    ///
    /// Returns `None` for kind codes this build does not know; such rows
    /// can never unlock a section.
    #[must_use]
    pub fn into_permission(self) -> Option<Permission> {
        let Some(kind) = PermissionKind::from_code(self.kind_code) else {
            tracing::warn!(
                permission_id = self.id,
                kind_code = self.kind_code,
                "Skipping permission with unknown kind code"
            );
            return None;
        };
        Some(Permission {
            id: self.id,
            kind,
            name: self.name,
            module: self.module,
            is_system: self.is_system,
        })
    }
}

/// Role row.
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// User row. Only the columns access resolution needs.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub role_id: Option<i32>,
    pub is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            role_id: row.role_id,
            is_active: row.is_active,
        }
    }
}
