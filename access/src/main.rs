//! `GraceWay` Access - Command Line Entry Point
//!
//! Validates the section registry against a live database, prints a user's
//! capability projection and seeds the default catalog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use gw_access::permissions::{
    queries, AccessService, PermissionCatalog, PermissionStore, PgPermissionStore,
    SectionRegistry,
};
use gw_access::{config, db};

#[derive(Parser, Debug)]
#[clap(
    name = "gw-access",
    version = env!("CARGO_PKG_VERSION"),
    about = "Resolve which application sections a user may open"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the section registry against the permission catalog
    Check,
    /// Print a user's capability projection as JSON
    Resolve {
        /// User id
        user_id: i32,
        /// Also print the user's permissions grouped by module
        #[clap(long)]
        modules: bool,
    },
    /// Create missing tables, then seed the default catalog and roles into an empty database
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gw_access=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = config::Config::from_env()?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting GraceWay Access");

    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    let store = PgPermissionStore::new(pool);

    match cli.command {
        Command::Check => {
            let catalog = PermissionCatalog::new(store.load_catalog().await?);
            let registry = SectionRegistry::standard();
            registry
                .validate(&catalog)
                .context("Section registry does not match the permission catalog")?;
            info!(
                permissions = catalog.len(),
                sections = registry.len(),
                "Section registry is consistent with the catalog"
            );
        }
        Command::Resolve { user_id, modules } => {
            let service = AccessService::initialize(
                store,
                SectionRegistry::standard(),
                config.cache_settings(),
            )
            .await?;
            let projection = service.projection_for(user_id).await?;
            println!("{}", serde_json::to_string_pretty(&*projection)?);
            if modules {
                let grouped = service.permissions_by_module(user_id).await?;
                println!("{}", serde_json::to_string_pretty(&grouped)?);
            }
        }
        Command::Seed => {
            db::run_migrations(store.pool()).await?;
            let summary = queries::seed_defaults(store.pool()).await?;
            if summary.is_empty() {
                info!("Database already holds permissions and roles, nothing seeded");
            } else {
                info!(
                    permissions = summary.permissions,
                    roles = summary.roles,
                    grants = summary.grants,
                    "Seeded default catalog"
                );
            }
        }
    }

    Ok(())
}
