//! Section Resolution Integration Tests
//!
//! Drives the access service end to end over the in-memory store with the
//! default roles.
//!
//! Run with: `cargo test -p gw-access --test resolution_test`

use gw_access::permissions::seed::{ADMINISTRATOR_ROLE, AVIATION_UMRAH_ROLE, OPERATIONS_ROLE};
use gw_access::permissions::{
    AccessService, CacheSettings, MemoryPermissionStore, PermissionCatalog, SectionRegistry,
};
use gw_common::{Error, PermissionKind, SectionId, SectionState, User};

// ============================================================================
// Helpers
// ============================================================================

async fn service_with(users: &[(i32, &str)]) -> AccessService<MemoryPermissionStore> {
    let store = MemoryPermissionStore::seeded();
    for (id, role) in users {
        let role = store.role_by_name(role).await.expect("seeded role");
        store
            .insert_user(User {
                id: *id,
                username: format!("user{id}"),
                role_id: Some(role.id),
                is_active: true,
            })
            .await;
    }
    AccessService::initialize(store, SectionRegistry::standard(), CacheSettings::default())
        .await
        .expect("registry should validate against the seeded catalog")
}

fn enabled(projection: &gw_common::CapabilityProjection) -> Vec<SectionId> {
    projection.enabled_sections().collect()
}

// ============================================================================
// Role scenarios
// ============================================================================

#[tokio::test]
async fn test_operations_department() {
    let service = service_with(&[(1, OPERATIONS_ROLE)]).await;
    let p = service.projection_for(1).await.unwrap();

    assert!(!p.is_administrator);
    assert_eq!(
        enabled(&p),
        vec![
            SectionId::Dashboard,
            SectionId::Trips,
            SectionId::Reports,
            SectionId::Calculator,
        ]
    );
    // Everything else stays in the navigation, locked.
    assert_eq!(p.visible_sections().count(), 17);
    assert_eq!(p.state(SectionId::Flights), SectionState::LOCKED);
}

#[tokio::test]
async fn test_aviation_and_umrah() {
    let service = service_with(&[(2, AVIATION_UMRAH_ROLE)]).await;
    let p = service.projection_for(2).await.unwrap();

    assert_eq!(
        enabled(&p),
        vec![
            SectionId::Dashboard,
            SectionId::Reservations,
            SectionId::Flights,
            SectionId::Umrah,
            SectionId::Reports,
            SectionId::Calculator,
        ]
    );
}

#[tokio::test]
async fn test_administrator() {
    let service = service_with(&[(3, ADMINISTRATOR_ROLE)]).await;
    let p = service.projection_for(3).await.unwrap();

    assert!(p.is_administrator);
    assert_eq!(enabled(&p), SectionId::all().to_vec());
}

#[tokio::test]
async fn test_locked_section_notice() {
    let service = service_with(&[(1, OPERATIONS_ROLE)]).await;
    let p = service.projection_for(1).await.unwrap();

    let err = p.require_enabled(SectionId::CashBox).unwrap_err();
    assert_eq!(err, Error::InsufficientPermission { section: SectionId::CashBox });
    assert_eq!(err.to_string(), "Insufficient permission to open Cash Box");
    assert!(p.require_enabled(SectionId::Trips).is_ok());
}

// ============================================================================
// Grant changes
// ============================================================================

#[tokio::test]
async fn test_accounting_grant_opens_only_matching_section() {
    let service = service_with(&[(1, OPERATIONS_ROLE)]).await;
    let catalog = PermissionCatalog::seeded();
    let customers = catalog.by_kind(PermissionKind::ViewCustomers).unwrap().id;

    service.grant_permission(1, customers).await.unwrap();
    let p = service.projection_for(1).await.unwrap();

    assert!(p.is_enabled(SectionId::Customers));
    assert!(!p.is_enabled(SectionId::Suppliers));
    assert!(!p.is_enabled(SectionId::Journals));
}

#[tokio::test]
async fn test_system_grant_promotes_to_administrator() {
    let service = service_with(&[(1, OPERATIONS_ROLE)]).await;
    let catalog = PermissionCatalog::seeded();
    let audit = catalog.by_kind(PermissionKind::ViewAuditLogs).unwrap().id;

    assert!(!service.projection_for(1).await.unwrap().is_administrator);
    service.grant_permission(1, audit).await.unwrap();
    assert!(service.projection_for(1).await.unwrap().is_administrator);

    service.revoke_permission(1, audit).await.unwrap();
    assert!(!service.projection_for(1).await.unwrap().is_administrator);
}

#[tokio::test]
async fn test_projection_serializes_in_navigation_order() {
    let service = service_with(&[(1, OPERATIONS_ROLE)]).await;
    let p = service.projection_for(1).await.unwrap();

    let json = serde_json::to_string(&*p).unwrap();
    let positions: Vec<_> = SectionId::all()
        .iter()
        .map(|s| json.find(&format!("\"{}\":", s.as_str())).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["sections"]["trips"]["enabled"], true);
    assert_eq!(value["sections"]["cashbox"]["enabled"], false);
}
