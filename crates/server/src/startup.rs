use std::sync::Arc;

use configs::{AppConfig, Driver};
use migration::MigratorTrait;
use service::repository::Repositories;
use service::scripts::SqlScripts;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes;
use crate::state::AppState;

/// Pick the storage backend named by the config and wire the repositories.
async fn build_repositories(cfg: &AppConfig) -> anyhow::Result<Repositories> {
    match cfg.database.driver {
        Driver::Memory => {
            warn!("memory driver selected; data is lost on shutdown");
            Ok(Repositories::memory())
        }
        Driver::Postgres => {
            let scripts = Arc::new(SqlScripts::new(&cfg.scripts.dir));
            scripts.verify().await;

            let db = models::db::connect(&cfg.database).await?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None).await?;
                info!("migrations applied");
            }
            Ok(Repositories::sql(db, scripts))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: build the app and serve it until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let repos = build_repositories(&cfg).await?;
    let app = routes::build_router(AppState::new(repos));

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, driver = ?cfg.database.driver, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
