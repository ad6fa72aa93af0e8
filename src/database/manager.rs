use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the submissions database
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Stored record {id} is not valid JSON: {source}")]
    CorruptRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if !matches!(db_err.kind(), sqlx::error::ErrorKind::Other) =>
            {
                DatabaseError::Constraint(db_err.message().to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

const CREATE_SUBMISSIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS submissions (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        createdAt TEXT NOT NULL
    )
"#;

const CREATE_SUBMISSIONS_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS submissions_created_at ON submissions (createdAt)";

/// Opens the SQLite pool and keeps the schema in place
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect using the configured URL and run migrations
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let mut options: SqliteConnectOptions = config.url.parse()?;
        options = options.create_if_missing(true);
        if !config.enable_query_logging {
            options = options.disable_statement_logging();
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        info!("Opened submissions database: {}", config.url);
        Ok(pool)
    }

    /// Private in-memory database. A single connection that never expires,
    /// since every SQLite memory connection is its own database.
    pub async fn memory() -> Result<SqlitePool, DatabaseError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::migrate(&pool).await?;
        Ok(pool)
    }

    pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_SUBMISSIONS).execute(pool).await?;
        sqlx::query(CREATE_SUBMISSIONS_CREATED_AT_INDEX).execute(pool).await?;
        Ok(())
    }

    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
