#![cfg(test)]
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> configs::DatabaseConfig {
    let mut cfg = configs::load_default().map(|c| c.database).unwrap_or_default();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        cfg.url = url;
    }
    if cfg.url.trim().is_empty() {
        cfg.url = models::db::DATABASE_URL.clone();
    }
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.min_connections = 1;
    cfg.connect_timeout_secs = 5;
    cfg.acquire_timeout_secs = 10;
    cfg
}

/// Fresh connection to a migrated test database, or `None` when DB tests
/// are disabled (`SKIP_DB_TESTS`) or no database is reachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let cfg = test_config();

    // Run migrations exactly once, with a throwaway connection
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let db = match connect_with_config(&cfg).await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {e}");
                    return false;
                }
            };
            if let Err(e) = migration::Migrator::up(&db, None).await {
                eprintln!("skip: migrate up failed: {e}");
                return false;
            }
            true
        })
        .await;
    if !migrated {
        return None;
    }

    // Return a fresh connection for the current test's runtime
    connect_with_config(&cfg).await.ok()
}
