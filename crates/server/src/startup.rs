use anyhow::Context;
use configs::AppConfig;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{routes, state::ServerState};
use service::activity::{ActivityService, SeaOrmActivityRepository};

/// Every origin is allowed.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(service = "server", event = "shutdown_signal", "received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

/// Public entry: connect the store, build the app and run the HTTP server.
///
/// A store that cannot be reached is fatal; the error bubbles up to the binary.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // DB connection + schema
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .context("cannot connect to database")?;
    migration::Migrator::up(&db, None)
        .await
        .context("database migration failed")?;

    // 仓储与服务在启动时构建一次，通过 ServerState 共享，不使用全局变量
    let activities = ActivityService::from_repo(SeaOrmActivityRepository::new(db));
    let state = ServerState::new(activities);

    // Build router
    let app = routes::build_router(state, build_cors(), cfg.server.request_timeout());

    // Bind and serve
    let listener = TcpListener::bind(cfg.server.bind_addr())
        .await
        .with_context(|| format!("cannot bind {}", cfg.server.bind_addr()))?;
    let addr = listener.local_addr()?;
    info!(%addr, "activity service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(service = "server", event = "stop", "server stopped");
    Ok(())
}
