//! Permission storage.
//!
//! [`PermissionStore`] is the seam between access resolution and wherever
//! roles and grants live. [`PgPermissionStore`] reads the shared `PostgreSQL`
//! schema; [`MemoryPermissionStore`] backs tests and tooling.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use gw_common::{Permission, ResolvedPermissionSet, Role, User};
use sqlx::PgPool;
use tokio::sync::RwLock;

use super::error::AccessError;
use super::queries;
use super::seed;

/// Read and write access to roles, grants and user role assignments.
pub trait PermissionStore: Send + Sync {
    /// Every permission definition.
    fn load_catalog(&self) -> impl Future<Output = Result<Vec<Permission>, AccessError>> + Send;

    /// A user's record, or `None` when no such user exists.
    fn load_user(
        &self,
        user_id: i32,
    ) -> impl Future<Output = Result<Option<User>, AccessError>> + Send;

    /// Permissions granted to a role. An unknown role has none.
    fn load_role_permissions(
        &self,
        role_id: i32,
    ) -> impl Future<Output = Result<ResolvedPermissionSet, AccessError>> + Send;

    /// Grant a permission to a role. Returns `false` when already granted.
    fn grant_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> impl Future<Output = Result<bool, AccessError>> + Send;

    /// Revoke a permission from a role. Returns `false` when not granted.
    fn revoke_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> impl Future<Output = Result<bool, AccessError>> + Send;

    /// Set or clear a user's role.
    fn assign_role(
        &self,
        user_id: i32,
        role_id: Option<i32>,
    ) -> impl Future<Output = Result<(), AccessError>> + Send;
}

// ============================================================================
// PostgreSQL
// ============================================================================

/// Store backed by the application database.
#[derive(Debug, Clone)]
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl PermissionStore for PgPermissionStore {
    async fn load_catalog(&self) -> Result<Vec<Permission>, AccessError> {
        let rows = queries::list_permissions(&self.pool).await?;
        Ok(rows.into_iter().filter_map(|row| row.into_permission()).collect())
    }

    async fn load_user(&self, user_id: i32) -> Result<Option<User>, AccessError> {
        Ok(queries::find_user(&self.pool, user_id).await?.map(User::from))
    }

    async fn load_role_permissions(
        &self,
        role_id: i32,
    ) -> Result<ResolvedPermissionSet, AccessError> {
        let rows = queries::list_role_permissions(&self.pool, role_id).await?;
        Ok(rows.into_iter().filter_map(|row| row.into_permission()).collect())
    }

    async fn grant_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, AccessError> {
        if queries::find_role(&self.pool, role_id).await?.is_none() {
            return Err(AccessError::RoleNotFound(role_id));
        }
        if !queries::permission_exists(&self.pool, permission_id).await? {
            return Err(AccessError::PermissionNotFound(permission_id));
        }
        Ok(queries::grant_role_permission(&self.pool, role_id, permission_id).await?)
    }

    async fn revoke_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, AccessError> {
        Ok(queries::revoke_role_permission(&self.pool, role_id, permission_id).await?)
    }

    async fn assign_role(&self, user_id: i32, role_id: Option<i32>) -> Result<(), AccessError> {
        if let Some(role_id) = role_id {
            if queries::find_role(&self.pool, role_id).await?.is_none() {
                return Err(AccessError::RoleNotFound(role_id));
            }
        }
        if !queries::set_user_role(&self.pool, user_id, role_id).await? {
            return Err(AccessError::UserNotFound(user_id));
        }
        Ok(())
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    catalog: BTreeMap<i32, Permission>,
    roles: BTreeMap<i32, Role>,
    grants: BTreeMap<i32, BTreeSet<i32>>,
    users: BTreeMap<i32, User>,
}

/// Store holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryPermissionStore {
    state: RwLock<MemoryState>,
    role_loads: AtomicUsize,
}

impl MemoryPermissionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the default catalog, roles and grants.
    #[must_use]
    pub fn seeded() -> Self {
        let catalog: BTreeMap<_, _> = seed::default_permissions()
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let roles: BTreeMap<_, _> = seed::default_roles()
            .into_iter()
            .map(|r| (r.id, r))
            .collect();
        let grants = seed::DEFAULT_ROLES
            .iter()
            .zip(1..)
            .map(|(role, role_id)| {
                let ids = catalog
                    .values()
                    .filter(|p| role.grants(p.kind))
                    .map(|p| p.id)
                    .collect();
                (role_id, ids)
            })
            .collect();

        Self {
            state: RwLock::new(MemoryState {
                catalog,
                roles,
                grants,
                users: BTreeMap::new(),
            }),
            role_loads: AtomicUsize::new(0),
        }
    }

    /// Add or replace a user.
    pub async fn insert_user(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Add or replace a permission definition.
    pub async fn insert_permission(&self, permission: Permission) {
        self.state
            .write()
            .await
            .catalog
            .insert(permission.id, permission);
    }

    /// Look up a role by name.
    pub async fn role_by_name(&self, name: &str) -> Option<Role> {
        self.state
            .read()
            .await
            .roles
            .values()
            .find(|r| r.name == name)
            .cloned()
    }

    /// Number of role permission loads served.
    #[must_use]
    pub fn role_loads(&self) -> usize {
        self.role_loads.load(Ordering::Relaxed)
    }
}

impl PermissionStore for MemoryPermissionStore {
    async fn load_catalog(&self) -> Result<Vec<Permission>, AccessError> {
        Ok(self.state.read().await.catalog.values().cloned().collect())
    }

    async fn load_user(&self, user_id: i32) -> Result<Option<User>, AccessError> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn load_role_permissions(
        &self,
        role_id: i32,
    ) -> Result<ResolvedPermissionSet, AccessError> {
        self.role_loads.fetch_add(1, Ordering::Relaxed);
        let state = self.state.read().await;
        let Some(ids) = state.grants.get(&role_id) else {
            return Ok(ResolvedPermissionSet::empty());
        };
        Ok(ids
            .iter()
            .filter_map(|id| state.catalog.get(id).cloned())
            .collect())
    }

    async fn grant_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, AccessError> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) {
            return Err(AccessError::RoleNotFound(role_id));
        }
        if !state.catalog.contains_key(&permission_id) {
            return Err(AccessError::PermissionNotFound(permission_id));
        }
        Ok(state.grants.entry(role_id).or_default().insert(permission_id))
    }

    async fn revoke_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, AccessError> {
        let mut state = self.state.write().await;
        Ok(state
            .grants
            .get_mut(&role_id)
            .is_some_and(|ids| ids.remove(&permission_id)))
    }

    async fn assign_role(&self, user_id: i32, role_id: Option<i32>) -> Result<(), AccessError> {
        let mut state = self.state.write().await;
        if let Some(role_id) = role_id {
            if !state.roles.contains_key(&role_id) {
                return Err(AccessError::RoleNotFound(role_id));
            }
        }
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(AccessError::UserNotFound(user_id))?;
        user.role_id = role_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gw_common::PermissionKind;

    use super::*;

    fn user(id: i32, role_id: Option<i32>) -> User {
        User {
            id,
            username: format!("user{id}"),
            role_id,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_seeded_store_matches_default_roles() {
        let store = MemoryPermissionStore::seeded();
        assert_eq!(store.load_catalog().await.unwrap().len(), 88);

        let ops = store.role_by_name(seed::OPERATIONS_ROLE).await.unwrap();
        let perms = store.load_role_permissions(ops.id).await.unwrap();
        assert!(perms.iter().any(|p| p.kind == PermissionKind::UseCalculator));
        assert!(!perms.iter().any(|p| p.kind == PermissionKind::ViewFlightBookings));

        let admin = store.role_by_name(seed::ADMINISTRATOR_ROLE).await.unwrap();
        assert_eq!(store.load_role_permissions(admin.id).await.unwrap().len(), 88);
    }

    #[tokio::test]
    async fn test_unknown_role_has_no_permissions() {
        let store = MemoryPermissionStore::seeded();
        assert!(store.load_role_permissions(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grant_and_revoke() {
        let store = MemoryPermissionStore::seeded();
        // Operations role does not hold the cash box by default
        let cashbox = seed::default_permissions()
            .into_iter()
            .find(|p| p.kind == PermissionKind::ViewCashBox)
            .unwrap();

        assert!(store.grant_permission(1, cashbox.id).await.unwrap());
        assert!(!store.grant_permission(1, cashbox.id).await.unwrap());
        assert!(store.revoke_permission(1, cashbox.id).await.unwrap());
        assert!(!store.revoke_permission(1, cashbox.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_rejects_unknown_ids() {
        let store = MemoryPermissionStore::seeded();
        assert!(matches!(
            store.grant_permission(42, 1).await,
            Err(AccessError::RoleNotFound(42))
        ));
        assert!(matches!(
            store.grant_permission(1, 4242).await,
            Err(AccessError::PermissionNotFound(4242))
        ));
    }

    #[tokio::test]
    async fn test_assign_role() {
        let store = MemoryPermissionStore::seeded();
        store.insert_user(user(5, None)).await;

        store.assign_role(5, Some(2)).await.unwrap();
        assert_eq!(store.load_user(5).await.unwrap().unwrap().role_id, Some(2));

        store.assign_role(5, None).await.unwrap();
        assert_eq!(store.load_user(5).await.unwrap().unwrap().role_id, None);

        assert!(matches!(
            store.assign_role(5, Some(77)).await,
            Err(AccessError::RoleNotFound(77))
        ));
        assert!(matches!(
            store.assign_role(6, Some(1)).await,
            Err(AccessError::UserNotFound(6))
        ));
    }
}
