use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use catalog::companies::repo::SeaOrmCompanyRepository;
use catalog::instrumentation::{self, ObserverChain, PrometheusObserver, SlowQueryLogger};
use catalog::pricing::HttpPriceClient;
use catalog::services::repo::SeaOrmServiceRepository;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tracing::info;

use crate::routes;
use crate::state::AppState;

/// Statements slower than this are logged at WARN.
const SLOW_QUERY_THRESHOLD: Duration = Duration::from_millis(200);

/// Connect, migrate and attach query observers.
pub async fn connect_database(cfg: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    let mut db = models::db::connect_with_config(&cfg.database)
        .await
        .context("connect to database")?;

    // observers must be attached before the connection is cloned into stores
    let chain = ObserverChain::new()
        .with(Arc::new(PrometheusObserver))
        .with(Arc::new(SlowQueryLogger::new(SLOW_QUERY_THRESHOLD)));
    instrumentation::attach(&mut db, Arc::new(chain));

    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await.context("apply migrations")?;
        info!("migrations applied");
    }
    Ok(db)
}

/// Stores, price client and application services over `db`.
pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> anyhow::Result<AppState> {
    let prices = HttpPriceClient::new(
        cfg.price_service.base_url.clone(),
        Duration::from_secs(cfg.price_service.timeout_secs),
    )?;
    info!(endpoint = %prices.endpoint(), "price client ready");

    Ok(AppState::new(
        Arc::new(SeaOrmCompanyRepository::new(db.clone())),
        Arc::new(SeaOrmServiceRepository::new(db)),
        Arc::new(prices),
        &cfg.metrics.service_name,
    ))
}

/// Public entry: build the app and serve until `shutdown` resolves.
pub async fn run(cfg: AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    let db = connect_database(&cfg).await?;
    let state = build_state(db, &cfg)?;
    let app = routes::build_router(state, &cfg.metrics);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .context("parse bind address")?;
    info!(%addr, metrics = cfg.metrics.enabled, "starting seller service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}
