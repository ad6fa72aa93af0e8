use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{ListQuery, Page, Submission, SubmissionRow};
use crate::value::Record;

pub const SUBMISSION_NOT_FOUND: &str = "No submission found with that ID";

/// Persistence for accepted submissions
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Store a new record under a generated id and the current timestamp
    async fn create(&self, data: &Record) -> Result<Submission, DatabaseError>;

    async fn get(&self, id: &str) -> Result<Submission, DatabaseError>;

    async fn list(&self, query: &ListQuery) -> Result<Page<Submission>, DatabaseError>;

    /// Replace the whole record; `createdAt` is kept
    async fn update(&self, id: &str, data: &Record) -> Result<(), DatabaseError>;

    async fn delete(&self, id: &str) -> Result<(), DatabaseError>;

    /// Cheap round trip to the backing database
    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// [`SubmissionStore`] over the `submissions` table
#[derive(Clone)]
pub struct SqliteSubmissionStore {
    pool: SqlitePool,
}

impl SqliteSubmissionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn search_pattern(query: &ListQuery) -> Option<String> {
        query.search.as_ref().map(|s| format!("%{}%", s))
    }
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = DatabaseError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let data = serde_json::from_str(&row.data).map_err(|source| DatabaseError::CorruptRecord {
            id: row.id.clone(),
            source,
        })?;
        Ok(Submission {
            id: row.id,
            data,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl SubmissionStore for SqliteSubmissionStore {
    async fn create(&self, data: &Record) -> Result<Submission, DatabaseError> {
        let id = Uuid::new_v4().to_string();
        let created_at = Self::timestamp();
        let json = serde_json::to_string(data)?;

        sqlx::query("INSERT INTO submissions (id, data, createdAt) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&json)
            .bind(&created_at)
            .execute(&self.pool)
            .await?;

        info!("Created submission {}", id);
        Ok(Submission {
            id,
            data: data.clone(),
            created_at,
        })
    }

    async fn get(&self, id: &str) -> Result<Submission, DatabaseError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "SELECT id, data, createdAt FROM submissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(SUBMISSION_NOT_FOUND.to_string()))?;

        row.try_into()
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Submission>, DatabaseError> {
        let pattern = Self::search_pattern(query);
        let where_clause = if pattern.is_some() { "WHERE data LIKE ?" } else { "" };

        let count_sql = format!("SELECT COUNT(*) FROM submissions {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(p) = &pattern {
            count_query = count_query.bind(p);
        }
        let total = count_query.fetch_one(&self.pool).await?.max(0) as u64;

        // rowid keeps insertion order among equal timestamps
        let dir = query.sort_order.to_sql();
        let select_sql = format!(
            "SELECT id, data, createdAt FROM submissions {} ORDER BY createdAt {}, rowid {} LIMIT ? OFFSET ?",
            where_clause, dir, dir
        );
        let mut select_query = sqlx::query_as::<_, SubmissionRow>(&select_sql);
        if let Some(p) = &pattern {
            select_query = select_query.bind(p);
        }
        let rows = select_query
            .bind(i64::from(query.limit))
            .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        debug!(
            "Listed {} of {} submissions (page {}, limit {}, {:?})",
            rows.len(),
            total,
            query.page,
            query.limit,
            query.sort_order
        );

        let items = rows
            .into_iter()
            .map(Submission::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, total, query))
    }

    async fn update(&self, id: &str, data: &Record) -> Result<(), DatabaseError> {
        let json = serde_json::to_string(data)?;
        let result = sqlx::query("UPDATE submissions SET data = ? WHERE id = ?")
            .bind(&json)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(SUBMISSION_NOT_FOUND.to_string()));
        }
        info!("Updated submission {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(SUBMISSION_NOT_FOUND.to_string()));
        }
        info!("Deleted submission {}", id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
