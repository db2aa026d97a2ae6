//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::quota::QuotaOutcome;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Accounts {
    users: HashMap<UserId, User>,
    /// email -> user ID
    email_index: HashMap<String, UserId>,
    /// API key hash -> user ID
    key_index: HashMap<String, UserId>,
}

impl Accounts {
    fn insert(&mut self, user: User) {
        self.email_index.insert(user.email().to_string(), *user.id());
        self.key_index
            .insert(user.api_key_hash().to_string(), *user.id());
        self.users.insert(*user.id(), user);
    }
}

/// In-memory implementation of UserRepository
///
/// All indexes sit behind one lock so quota consumption and key rotation are atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    accounts: Arc<RwLock<Accounts>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .email_index
            .get(email)
            .and_then(|id| accounts.users.get(id))
            .cloned())
    }

    async fn get_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .key_index
            .get(hash)
            .and_then(|id| accounts.users.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.email_index.contains_key(user.email()) {
            return Err(DomainError::conflict("Email already registered"));
        }

        if accounts.users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        accounts.insert(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut accounts = self.accounts.write().await;

        let previous = accounts
            .users
            .get(user.id())
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", user.id())))?;

        let email_taken = accounts
            .email_index
            .get(user.email())
            .is_some_and(|owner| owner != user.id());

        if email_taken {
            return Err(DomainError::conflict("Email already registered"));
        }

        accounts.email_index.remove(previous.email());
        accounts.key_index.remove(previous.api_key_hash());
        accounts.insert(user.clone());

        Ok(user.clone())
    }

    async fn consume_quota(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<QuotaOutcome, DomainError> {
        let mut accounts = self.accounts.write().await;

        let user = accounts
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        Ok(user.consume_request(now))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.users.len())
    }
}
