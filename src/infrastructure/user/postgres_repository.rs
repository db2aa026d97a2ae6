//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::plan::SubscriptionPlan;
use crate::domain::quota::{next_reset, QuotaOutcome};
use crate::domain::user::{User, UserId, UserRepository, UserSnapshot};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, email, password_hash, api_key_hash, api_key_prefix, \
     subscription_plan, monthly_requests, last_request_reset, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by {}: {}", column, e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("email", email).await
    }

    async fn get_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("api_key_hash", hash).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, api_key_hash, api_key_prefix,
                               subscription_plan, monthly_requests, last_request_reset,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.api_key_hash())
        .bind(user.api_key_prefix())
        .bind(user.subscription_plan().as_str())
        .bind(user.monthly_requests() as i32)
        .bind(user.last_request_reset())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("Email already registered")
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, api_key_hash = $4, api_key_prefix = $5,
                subscription_plan = $6, monthly_requests = $7, last_request_reset = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.api_key_hash())
        .bind(user.api_key_prefix())
        .bind(user.subscription_plan().as_str())
        .bind(user.monthly_requests() as i32)
        .bind(user.last_request_reset())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("Email already registered")
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn consume_quota(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<QuotaOutcome, DomainError> {
        // Reset when the UTC month differs and increment in one statement. The row is
        // only touched when the (possibly reset) counter is under the limit.
        let consumed = sqlx::query(
            r#"
            UPDATE users
            SET monthly_requests = CASE
                    WHEN date_trunc('month', last_request_reset AT TIME ZONE 'UTC')
                         <> date_trunc('month', $2 AT TIME ZONE 'UTC')
                    THEN 1
                    ELSE monthly_requests + 1
                END,
                last_request_reset = CASE
                    WHEN date_trunc('month', last_request_reset AT TIME ZONE 'UTC')
                         <> date_trunc('month', $2 AT TIME ZONE 'UTC')
                    THEN $2
                    ELSE last_request_reset
                END,
                updated_at = $2
            WHERE id = $1
              AND (
                date_trunc('month', last_request_reset AT TIME ZONE 'UTC')
                    <> date_trunc('month', $2 AT TIME ZONE 'UTC')
                OR monthly_requests < CASE subscription_plan
                    WHEN 'PRO' THEN $4
                    WHEN 'ENTERPRISE' THEN $5
                    ELSE $3
                END
              )
            RETURNING monthly_requests, subscription_plan
            "#,
        )
        .bind(id.as_uuid())
        .bind(now)
        .bind(SubscriptionPlan::Hobby.monthly_limit() as i32)
        .bind(SubscriptionPlan::Pro.monthly_limit() as i32)
        .bind(SubscriptionPlan::Enterprise.monthly_limit() as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to consume quota: {}", e)))?;

        if let Some(row) = consumed {
            let used: i32 = row.get("monthly_requests");
            let plan: String = row.get("subscription_plan");
            return Ok(QuotaOutcome::Consumed {
                used: used.max(0) as u32,
                limit: str_to_plan(&plan).monthly_limit(),
            });
        }

        // Nothing updated: either the account is gone or the quota is spent
        let plan: Option<String> =
            sqlx::query_scalar("SELECT subscription_plan FROM users WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to read plan: {}", e)))?;

        match plan {
            Some(plan) => Ok(QuotaOutcome::Exhausted {
                limit: str_to_plan(&plan).monthly_limit(),
                reset_at: next_reset(now),
            }),
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    let msg = error.to_string();
    msg.contains("duplicate key") || msg.contains("unique constraint")
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: Uuid = row.get("id");
    let plan: String = row.get("subscription_plan");
    let monthly_requests: i32 = row.get("monthly_requests");

    Ok(User::from(UserSnapshot {
        id: UserId::from_uuid(id),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        api_key_hash: row.get("api_key_hash"),
        api_key_prefix: row.get("api_key_prefix"),
        subscription_plan: str_to_plan(&plan),
        monthly_requests: u32::try_from(monthly_requests).map_err(|_| {
            DomainError::storage(format!(
                "Invalid monthly_requests in database: {}",
                monthly_requests
            ))
        })?,
        last_request_reset: row.get("last_request_reset"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }))
}

fn str_to_plan(s: &str) -> SubscriptionPlan {
    s.parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_conversion() {
        assert_eq!(str_to_plan("HOBBY"), SubscriptionPlan::Hobby);
        assert_eq!(str_to_plan("PRO"), SubscriptionPlan::Pro);
        assert_eq!(str_to_plan("ENTERPRISE"), SubscriptionPlan::Enterprise);
        assert_eq!(str_to_plan("unknown"), SubscriptionPlan::Hobby);
    }

    #[test]
    fn test_user_columns_cover_snapshot() {
        for column in [
            "email",
            "password_hash",
            "api_key_hash",
            "api_key_prefix",
            "subscription_plan",
            "monthly_requests",
            "last_request_reset",
        ] {
            assert!(USER_COLUMNS.contains(column), "missing column {}", column);
        }
    }
}
