//! Database Queries
//!
//! Runtime queries against the `users`, `roles`, `permissions` and
//! `rolepermissions` tables (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.

use sqlx::PgPool;
use tracing::error;

use super::models::{PermissionRow, RoleRow, UserRow};
use super::seed::{DEFAULT_PERMISSIONS, DEFAULT_ROLES};

/// Log and return a database error with context.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
    ($query:expr) => {
        |e| {
            error!(query = $query, error = %e, "Database query failed");
            e
        }
    };
}

const PERMISSION_COLUMNS: &str = r#"p.permissionid AS id,
       p."PermissionType" AS kind_code,
       p.permissionname AS name,
       p."Module" AS module,
       p."IsSystemPermission" AS is_system"#;

// ============================================================================
// Catalog Queries
// ============================================================================

/// List every permission definition, ordered by id.
pub async fn list_permissions(pool: &PgPool) -> sqlx::Result<Vec<PermissionRow>> {
    sqlx::query_as::<_, PermissionRow>(&format!(
        "SELECT {PERMISSION_COLUMNS} FROM permissions p ORDER BY p.permissionid"
    ))
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_permissions"))
}

/// Check that a permission definition exists.
pub async fn permission_exists(pool: &PgPool, permission_id: i32) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM permissions WHERE permissionid = $1)",
    )
    .bind(permission_id)
    .fetch_one(pool)
    .await
    .map_err(db_error!("permission_exists", permission_id))
}

// ============================================================================
// Role Queries
// ============================================================================

/// Find a role by id.
pub async fn find_role(pool: &PgPool, role_id: i32) -> sqlx::Result<Option<RoleRow>> {
    sqlx::query_as::<_, RoleRow>(
        "SELECT roleid AS id, rolename AS name, description FROM roles WHERE roleid = $1",
    )
    .bind(role_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_role", role_id))
}

/// Permissions granted to a role, ordered by id.
pub async fn list_role_permissions(
    pool: &PgPool,
    role_id: i32,
) -> sqlx::Result<Vec<PermissionRow>> {
    sqlx::query_as::<_, PermissionRow>(&format!(
        "SELECT {PERMISSION_COLUMNS}
         FROM rolepermissions rp
         JOIN permissions p ON p.permissionid = rp.permissionid
         WHERE rp.roleid = $1
         ORDER BY p.permissionid"
    ))
    .bind(role_id)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_role_permissions", role_id))
}

/// Grant a permission to a role.
///
/// Returns `false` when the grant already existed.
pub async fn grant_role_permission(
    pool: &PgPool,
    role_id: i32,
    permission_id: i32,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "INSERT INTO rolepermissions (roleid, permissionid)
         SELECT $1, $2
         WHERE NOT EXISTS (
             SELECT 1 FROM rolepermissions WHERE roleid = $1 AND permissionid = $2
         )",
    )
    .bind(role_id)
    .bind(permission_id)
    .execute(pool)
    .await
    .map_err(db_error!("grant_role_permission", role_id, permission_id))?;

    Ok(result.rows_affected() > 0)
}

/// Revoke a permission from a role.
///
/// Returns `false` when the role did not hold it.
pub async fn revoke_role_permission(
    pool: &PgPool,
    role_id: i32,
    permission_id: i32,
) -> sqlx::Result<bool> {
    let result =
        sqlx::query("DELETE FROM rolepermissions WHERE roleid = $1 AND permissionid = $2")
            .bind(role_id)
            .bind(permission_id)
            .execute(pool)
            .await
            .map_err(db_error!("revoke_role_permission", role_id, permission_id))?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// User Queries
// ============================================================================

/// Find a user by id.
pub async fn find_user(pool: &PgPool, user_id: i32) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        "SELECT userid AS id, username, roleid AS role_id, isactive AS is_active
         FROM users WHERE userid = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_user", user_id))
}

/// Set or clear a user's role.
///
/// Returns `false` when no such user exists.
pub async fn set_user_role(
    pool: &PgPool,
    user_id: i32,
    role_id: Option<i32>,
) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE users SET roleid = $2, updatedat = NOW() WHERE userid = $1")
        .bind(user_id)
        .bind(role_id)
        .execute(pool)
        .await
        .map_err(db_error!("set_user_role", user_id, ?role_id))?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Seeding
// ============================================================================

/// Rows written by [`seed_defaults`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub permissions: u64,
    pub roles: u64,
    pub grants: u64,
}

impl SeedSummary {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.permissions == 0 && self.roles == 0 && self.grants == 0
    }
}

/// Populate an empty database with the default catalog and roles.
///
/// Each table is only written when it is empty, so running this against a
/// live database is a no-op. Runs in a single transaction.
pub async fn seed_defaults(pool: &PgPool) -> sqlx::Result<SeedSummary> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    let has_permissions: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM permissions)")
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error!("seed_defaults.check_permissions"))?;

    if !has_permissions {
        for seed in DEFAULT_PERMISSIONS {
            summary.permissions += sqlx::query(
                r#"INSERT INTO permissions
                   (permissionname, description, "Category", "Module", "IsSystemPermission", "PermissionType")
                   VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(seed.kind.as_str())
            .bind(seed.name)
            .bind(seed.category)
            .bind(seed.kind.default_module().as_str())
            .bind(seed.is_system)
            .bind(seed.kind.code())
            .execute(&mut *tx)
            .await
            .map_err(db_error!("seed_defaults.insert_permission", kind = %seed.kind))?
            .rows_affected();
        }
    }

    let has_roles: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles)")
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error!("seed_defaults.check_roles"))?;

    if !has_roles {
        for seed in DEFAULT_ROLES {
            let role_id: i32 = sqlx::query_scalar(
                "INSERT INTO roles (rolename, description) VALUES ($1, $2) RETURNING roleid",
            )
            .bind(seed.name)
            .bind(seed.description)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error!("seed_defaults.insert_role", role = seed.name))?;
            summary.roles += 1;

            let codes: Vec<i32> = match seed.kinds {
                Some(kinds) => kinds.iter().map(|k| k.code()).collect(),
                None => DEFAULT_PERMISSIONS.iter().map(|p| p.kind.code()).collect(),
            };

            summary.grants += sqlx::query(
                r#"INSERT INTO rolepermissions (roleid, permissionid)
                   SELECT $1, permissionid FROM permissions
                   WHERE "PermissionType" = ANY($2)"#,
            )
            .bind(role_id)
            .bind(codes)
            .execute(&mut *tx)
            .await
            .map_err(db_error!("seed_defaults.grant_role", role = seed.name))?
            .rows_affected();
        }
    }

    tx.commit().await?;
    Ok(summary)
}
