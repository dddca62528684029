#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::scripts::SqlScripts;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// The scripts shipped at the workspace root.
pub fn repo_scripts() -> SqlScripts {
    SqlScripts::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../sql"))
}

/// `DATABASE_URL` from the environment or `.env`, if any.
fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty())
}

/// A migrated PostgreSQL connection, or `None` when `SKIP_DB_TESTS` is set
/// or no `DATABASE_URL` is available.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL missing; skip db tests");
        return Ok(None);
    };
    let cfg = DatabaseConfig { url: Some(url), min_connections: 1, ..Default::default() };

    MIGRATED
        .get_or_try_init(|| async {
            let db = models::db::connect(&cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    Ok(Some(models::db::connect(&cfg).await?))
}
