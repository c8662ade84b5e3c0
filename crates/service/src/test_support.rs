#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connect to the test database, or `None` when no database is reachable so
/// DB-backed tests skip instead of failing on machines without Postgres.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(_) => return Ok(None),
    };
    MIGRATED
        .get_or_init(|| async {
            migration::Migrator::up(&db, None).await.expect("migrate up");
        })
        .await;
    Ok(Some(db))
}
