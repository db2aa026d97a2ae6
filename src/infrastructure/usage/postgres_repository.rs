//! PostgreSQL usage repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::usage::{ApiUsage, UsageRecordId, UsageRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct PostgresUsageRepository {
    pool: PgPool,
}

impl PostgresUsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageRepository for PostgresUsageRepository {
    async fn record(&self, usage: ApiUsage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_usage (id, user_id, endpoint, timestamp)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(usage.id.as_uuid())
        .bind(usage.user_id.as_uuid())
        .bind(&usage.endpoint)
        .bind(usage.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record usage: {}", e)))?;

        Ok(())
    }

    async fn list_recent(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ApiUsage>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, endpoint, timestamp
            FROM api_usage
            WHERE user_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list usage: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                let user_id: Uuid = row.get("user_id");

                ApiUsage {
                    id: UsageRecordId::from_uuid(id),
                    user_id: UserId::from_uuid(user_id),
                    endpoint: row.get("endpoint"),
                    timestamp: row.get("timestamp"),
                }
            })
            .collect())
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM api_usage WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count usage: {}", e)))?;

        Ok(count as usize)
    }
}
