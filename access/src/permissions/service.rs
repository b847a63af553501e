//! Access service.
//!
//! Serves capability projections and permission checks for users. Owns the
//! validated section registry, the catalog it was validated against and the
//! projection cache.
//!
//! Every mutation made through the service invalidates the affected cached
//! projections before it returns, so the next lookup reflects it.

use std::collections::BTreeMap;
use std::sync::Arc;

use gw_common::{CapabilityProjection, PermissionKind, ResolvedPermissionSet};

use super::cache::{CacheSettings, ProjectionCache};
use super::catalog::PermissionCatalog;
use super::error::AccessError;
use super::grouper::ModuleSet;
use super::registry::SectionRegistry;
use super::resolver;
use super::store::PermissionStore;

/// Resolves and caches what each user may open.
pub struct AccessService<S> {
    store: S,
    registry: SectionRegistry,
    catalog: PermissionCatalog,
    cache: Option<ProjectionCache>,
}

impl<S: PermissionStore> AccessService<S> {
    /// Load the catalog and validate the registry against it.
    ///
    /// Fails when the catalog is empty or a section references a module or
    /// permission kind the catalog lacks. Callers must not serve requests
    /// after a failure here.
    pub async fn initialize(
        store: S,
        registry: SectionRegistry,
        settings: CacheSettings,
    ) -> Result<Self, AccessError> {
        let catalog = PermissionCatalog::new(store.load_catalog().await?);
        if catalog.is_empty() {
            return Err(AccessError::EmptyCatalog);
        }
        registry.validate(&catalog)?;

        tracing::info!(
            permissions = catalog.len(),
            sections = registry.len(),
            cache_enabled = settings.enabled,
            "Access service initialized"
        );

        Ok(Self {
            store,
            registry,
            catalog,
            cache: settings
                .enabled
                .then(|| ProjectionCache::new(settings.max_age)),
        })
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub const fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Permissions a user effectively holds.
    ///
    /// Missing, inactive and role-less users hold nothing.
    #[tracing::instrument(skip(self))]
    pub async fn load_permissions(
        &self,
        user_id: i32,
    ) -> Result<ResolvedPermissionSet, AccessError> {
        let Some(user) = self.store.load_user(user_id).await? else {
            tracing::debug!("Unknown user, granting minimal access");
            return Ok(ResolvedPermissionSet::empty());
        };
        if !user.is_active {
            tracing::debug!("Inactive user, granting minimal access");
            return Ok(ResolvedPermissionSet::empty());
        }
        let Some(role_id) = user.role_id else {
            return Ok(ResolvedPermissionSet::empty());
        };
        self.store.load_role_permissions(role_id).await
    }

    /// Capability projection for a user.
    #[tracing::instrument(skip(self))]
    pub async fn projection_for(
        &self,
        user_id: i32,
    ) -> Result<Arc<CapabilityProjection>, AccessError> {
        let Some(cache) = &self.cache else {
            let permissions = self.load_permissions(user_id).await?;
            return Ok(Arc::new(resolver::resolve(&permissions, &self.registry)));
        };

        // Fast path: projection already cached
        if let Some(projection) = cache.get(user_id) {
            tracing::debug!("Capability projection cache hit");
            return Ok(projection);
        }
        tracing::debug!("Capability projection cache miss");

        // Capture generations before store reads
        let observed = cache.generation(user_id);
        let permissions = self.load_permissions(user_id).await?;
        let projection = Arc::new(resolver::resolve(&permissions, &self.registry));
        cache.insert(user_id, observed, Arc::clone(&projection));

        Ok(projection)
    }

    async fn module_set(&self, user_id: i32) -> Result<ModuleSet, AccessError> {
        let permissions = self.load_permissions(user_id).await?;
        Ok(ModuleSet::from_permissions(&permissions))
    }

    /// Whether the user holds `kind` in any module.
    pub async fn has_permission(
        &self,
        user_id: i32,
        kind: PermissionKind,
    ) -> Result<bool, AccessError> {
        Ok(self.module_set(user_id).await?.has_kind(kind))
    }

    /// Whether the user holds at least one of `kinds`. An empty list is
    /// satisfied trivially.
    pub async fn has_any_permission(
        &self,
        user_id: i32,
        kinds: &[PermissionKind],
    ) -> Result<bool, AccessError> {
        if kinds.is_empty() {
            return Ok(true);
        }
        let modules = self.module_set(user_id).await?;
        Ok(kinds.iter().any(|k| modules.has_kind(*k)))
    }

    /// Whether the user holds every one of `kinds`.
    pub async fn has_all_permissions(
        &self,
        user_id: i32,
        kinds: &[PermissionKind],
    ) -> Result<bool, AccessError> {
        if kinds.is_empty() {
            return Ok(true);
        }
        let modules = self.module_set(user_id).await?;
        Ok(kinds.iter().all(|k| modules.has_kind(*k)))
    }

    /// The user's permissions grouped by module tag.
    pub async fn permissions_by_module(
        &self,
        user_id: i32,
    ) -> Result<BTreeMap<String, Vec<PermissionKind>>, AccessError> {
        Ok(self.module_set(user_id).await?.to_map())
    }

    /// Grant a permission to a role.
    ///
    /// Any number of users may hold the role, so every cached projection is
    /// dropped.
    #[tracing::instrument(skip(self))]
    pub async fn grant_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, AccessError> {
        let changed = self.store.grant_permission(role_id, permission_id).await?;
        if changed {
            self.invalidate_all();
        }
        Ok(changed)
    }

    /// Revoke a permission from a role.
    #[tracing::instrument(skip(self))]
    pub async fn revoke_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, AccessError> {
        let changed = self.store.revoke_permission(role_id, permission_id).await?;
        if changed {
            self.invalidate_all();
        }
        Ok(changed)
    }

    /// Set or clear a user's role.
    #[tracing::instrument(skip(self))]
    pub async fn assign_role(&self, user_id: i32, role_id: Option<i32>) -> Result<(), AccessError> {
        self.store.assign_role(user_id, role_id).await?;
        self.invalidate_user(user_id);
        Ok(())
    }

    /// Drop every cached projection. Call after editing grants outside this
    /// service.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            tracing::debug!("Invalidated all capability projections");
        }
    }

    /// Drop one user's cached projection.
    pub fn invalidate_user(&self, user_id: i32) {
        if let Some(cache) = &self.cache {
            cache.invalidate_user(user_id);
            tracing::debug!(user_id, "Invalidated capability projection");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gw_common::{Permission, SectionId, User};

    use super::*;
    use crate::permissions::error::RegistryError;
    use crate::permissions::seed;
    use crate::permissions::store::MemoryPermissionStore;

    const OPS_USER: i32 = 1;
    const AVIATION_USER: i32 = 2;
    const ADMIN_USER: i32 = 3;
    const NO_ROLE_USER: i32 = 4;
    const INACTIVE_USER: i32 = 5;

    fn user(id: i32, role_id: Option<i32>, is_active: bool) -> User {
        User {
            id,
            username: format!("user{id}"),
            role_id,
            is_active,
        }
    }

    async fn store() -> MemoryPermissionStore {
        let store = MemoryPermissionStore::seeded();
        store.insert_user(user(OPS_USER, Some(1), true)).await;
        store.insert_user(user(AVIATION_USER, Some(2), true)).await;
        store.insert_user(user(ADMIN_USER, Some(3), true)).await;
        store.insert_user(user(NO_ROLE_USER, None, true)).await;
        store.insert_user(user(INACTIVE_USER, Some(3), false)).await;
        store
    }

    async fn service() -> AccessService<MemoryPermissionStore> {
        AccessService::initialize(
            store().await,
            SectionRegistry::standard(),
            CacheSettings::default(),
        )
        .await
        .unwrap()
    }

    fn permission_id(kind: PermissionKind) -> i32 {
        PermissionCatalog::seeded().by_kind(kind).unwrap().id
    }

    #[tokio::test]
    async fn test_initialize_rejects_empty_catalog() {
        let result = AccessService::initialize(
            MemoryPermissionStore::new(),
            SectionRegistry::standard(),
            CacheSettings::default(),
        )
        .await;
        assert!(matches!(result, Err(AccessError::EmptyCatalog)));
    }

    #[tokio::test]
    async fn test_initialize_rejects_incomplete_catalog() {
        let store = MemoryPermissionStore::new();
        store
            .insert_permission(Permission::new(1, PermissionKind::ViewTrips))
            .await;
        let result =
            AccessService::initialize(store, SectionRegistry::standard(), CacheSettings::default())
                .await;
        assert!(matches!(
            result,
            Err(AccessError::Registry(RegistryError::UnknownModule { .. }))
        ));
    }

    #[tokio::test]
    async fn test_administrator_projection() {
        let service = service().await;
        let p = service.projection_for(ADMIN_USER).await.unwrap();
        assert!(p.is_administrator);
        assert!(p.is_enabled(SectionId::Users));
    }

    #[tokio::test]
    async fn test_missing_inactive_and_roleless_users_get_minimal_access() {
        let service = service().await;
        for user_id in [NO_ROLE_USER, INACTIVE_USER, 999] {
            let p = service.projection_for(user_id).await.unwrap();
            assert!(!p.is_administrator);
            assert_eq!(p.enabled_sections().collect::<Vec<_>>(), vec![SectionId::Dashboard]);
        }
    }

    #[tokio::test]
    async fn test_projection_is_cached() {
        let service = service().await;
        service.projection_for(OPS_USER).await.unwrap();
        service.projection_for(OPS_USER).await.unwrap();
        assert_eq!(service.store().role_loads(), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_reloads() {
        let settings = CacheSettings {
            enabled: false,
            ..CacheSettings::default()
        };
        let service =
            AccessService::initialize(store().await, SectionRegistry::standard(), settings)
                .await
                .unwrap();
        service.projection_for(OPS_USER).await.unwrap();
        service.projection_for(OPS_USER).await.unwrap();
        assert_eq!(service.store().role_loads(), 2);
    }

    #[tokio::test]
    async fn test_expired_projection_reloads() {
        let settings = CacheSettings {
            enabled: true,
            max_age: Duration::ZERO,
        };
        let service =
            AccessService::initialize(store().await, SectionRegistry::standard(), settings)
                .await
                .unwrap();
        service.projection_for(OPS_USER).await.unwrap();
        service.projection_for(OPS_USER).await.unwrap();
        assert_eq!(service.store().role_loads(), 2);
    }

    #[tokio::test]
    async fn test_revocation_visible_on_next_lookup() {
        let service = service().await;
        let cashbox = permission_id(PermissionKind::ViewCashBox);
        service.store().grant_permission(1, cashbox).await.unwrap();
        let before = service.projection_for(OPS_USER).await.unwrap();
        assert!(before.is_enabled(SectionId::CashBox));

        let revoked = service.revoke_permission(1, cashbox).await.unwrap();
        assert!(revoked);

        let after = service.projection_for(OPS_USER).await.unwrap();
        assert!(!after.is_enabled(SectionId::CashBox));
        assert!(after.is_enabled(SectionId::Trips));
    }

    #[tokio::test]
    async fn test_grant_visible_on_next_lookup() {
        let service = service().await;
        assert!(!service
            .projection_for(OPS_USER)
            .await
            .unwrap()
            .is_enabled(SectionId::CashBox));

        service
            .grant_permission(1, permission_id(PermissionKind::ViewCashBox))
            .await
            .unwrap();

        let p = service.projection_for(OPS_USER).await.unwrap();
        assert!(p.is_enabled(SectionId::CashBox));
        assert!(!p.is_enabled(SectionId::Customers));
    }

    #[tokio::test]
    async fn test_role_reassignment_visible_on_next_lookup() {
        let service = service().await;
        let before = service.projection_for(OPS_USER).await.unwrap();
        assert!(!before.is_enabled(SectionId::Flights));

        service.assign_role(OPS_USER, Some(2)).await.unwrap();
        let after = service.projection_for(OPS_USER).await.unwrap();
        assert!(after.is_enabled(SectionId::Flights));
        assert!(!after.is_enabled(SectionId::Trips));

        service.assign_role(OPS_USER, None).await.unwrap();
        let none = service.projection_for(OPS_USER).await.unwrap();
        assert_eq!(none.enabled_sections().collect::<Vec<_>>(), vec![SectionId::Dashboard]);
    }

    #[tokio::test]
    async fn test_role_reassignment_keeps_other_users_cached() {
        let service = service().await;
        service.projection_for(AVIATION_USER).await.unwrap();
        service.assign_role(OPS_USER, Some(2)).await.unwrap();
        service.projection_for(AVIATION_USER).await.unwrap();
        assert_eq!(service.store().role_loads(), 1);
    }

    #[tokio::test]
    async fn test_external_edit_visible_after_invalidate_all() {
        let service = service().await;
        let cashbox = permission_id(PermissionKind::ViewCashBox);
        service.store().grant_permission(1, cashbox).await.unwrap();
        service.projection_for(OPS_USER).await.unwrap();

        // Edit the store directly, bypassing the service.
        service.store().revoke_permission(1, cashbox).await.unwrap();
        let stale = service.projection_for(OPS_USER).await.unwrap();
        assert!(stale.is_enabled(SectionId::CashBox));

        service.invalidate_all();
        let fresh = service.projection_for(OPS_USER).await.unwrap();
        assert!(!fresh.is_enabled(SectionId::CashBox));
    }

    #[tokio::test]
    async fn test_permission_checks() {
        let service = service().await;
        assert!(service
            .has_permission(OPS_USER, PermissionKind::ViewTrips)
            .await
            .unwrap());
        assert!(!service
            .has_permission(OPS_USER, PermissionKind::ViewFlightBookings)
            .await
            .unwrap());
        assert!(service
            .has_any_permission(
                OPS_USER,
                &[PermissionKind::ViewFlightBookings, PermissionKind::UseCalculator]
            )
            .await
            .unwrap());
        assert!(!service
            .has_all_permissions(
                OPS_USER,
                &[PermissionKind::ViewFlightBookings, PermissionKind::UseCalculator]
            )
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_empty_permission_lists_are_satisfied() {
        let service = service().await;
        assert!(service.has_any_permission(NO_ROLE_USER, &[]).await.unwrap());
        assert!(service.has_all_permissions(NO_ROLE_USER, &[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_permissions_by_module() {
        let service = service().await;
        let map = service.permissions_by_module(OPS_USER).await.unwrap();
        let tags: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["Calculator", "Reports", "Trips"]);
        assert_eq!(map["Trips"].len(), 6);

        let seeded_ops = seed::DEFAULT_ROLES[0]
            .kinds
            .map_or(0, <[PermissionKind]>::len);
        assert_eq!(map.values().map(Vec::len).sum::<usize>(), seeded_ops);
    }

    #[tokio::test]
    async fn test_grant_unknown_role_is_error() {
        let service = service().await;
        assert!(matches!(
            service.grant_permission(99, 1).await,
            Err(AccessError::RoleNotFound(99))
        ));
    }
}
