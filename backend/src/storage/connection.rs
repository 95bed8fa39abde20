use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// Default database URL when nothing is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite:finance_tracker.db";

/// DbConnection owns the SQLite pool and the schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url`
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // One row per linked provider account
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                provider TEXT NOT NULL,
                external_id TEXT NOT NULL,
                display_name TEXT NOT NULL,
                email TEXT,
                avatar_url TEXT,
                locale TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                last_login_at TEXT NOT NULL,
                UNIQUE (provider, external_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Index for listing users by name
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_users_display_name
            ON users(display_name ASC);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
