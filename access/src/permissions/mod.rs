//! Section access control.
//!
//! Role-based model:
//! - Roles hold permissions; each permission carries a module tag
//! - Sections unlock by module membership or by explicit permission kind
//! - Holding anything in the `System` module makes a user an administrator

pub mod cache;
pub mod catalog;
pub mod error;
pub mod grouper;
pub mod models;
pub mod queries;
pub mod registry;
pub mod resolver;
pub mod seed;
pub mod service;
pub mod store;

pub use cache::{CacheSettings, ProjectionCache};
pub use catalog::PermissionCatalog;
pub use error::{AccessError, RegistryError};
pub use grouper::ModuleSet;
pub use registry::{Rule, SectionDefinition, SectionRegistry, Visibility, STANDARD_SECTIONS};
pub use resolver::{resolve, resolve_capabilities};
pub use service::AccessService;
pub use store::{MemoryPermissionStore, PermissionStore, PgPermissionStore};
