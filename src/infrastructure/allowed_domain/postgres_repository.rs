//! PostgreSQL allowed domain repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::allowed_domain::{AllowedDomain, AllowedDomainId, AllowedDomainRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::user::is_unique_violation;

#[derive(Debug, Clone)]
pub struct PostgresAllowedDomainRepository {
    pool: PgPool,
}

impl PostgresAllowedDomainRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AllowedDomainRepository for PostgresAllowedDomainRepository {
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<AllowedDomain>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, domain, created_at
            FROM allowed_domains
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list allowed domains: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                let user_id: Uuid = row.get("user_id");

                AllowedDomain {
                    id: AllowedDomainId::from_uuid(id),
                    user_id: UserId::from_uuid(user_id),
                    domain: row.get("domain"),
                    created_at: row.get("created_at"),
                }
            })
            .collect())
    }

    async fn create(&self, domain: AllowedDomain) -> Result<AllowedDomain, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO allowed_domains (id, user_id, domain, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(domain.id.as_uuid())
        .bind(domain.user_id.as_uuid())
        .bind(&domain.domain)
        .bind(domain.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("Domain already exists for this user")
            } else {
                DomainError::storage(format!("Failed to create allowed domain: {}", e))
            }
        })?;

        Ok(domain)
    }

    async fn delete(&self, user_id: &UserId, id: &AllowedDomainId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM allowed_domains WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete allowed domain: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
