//! Account service: registration, login and API key management

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::domain::user::{
    normalize_email, validate_email, validate_password, User, UserId, UserRepository,
};
use crate::domain::{DomainError, QuotaOutcome};
use crate::infrastructure::api_key::{hash_key, ApiKeyGenerator};

use super::password::PasswordHasher;

/// A freshly registered account and its plaintext API key
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user: User,
    pub api_key: String,
}

/// User service for authentication and account management
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    key_generator: ApiKeyGenerator,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        key_generator: ApiKeyGenerator,
    ) -> Self {
        Self {
            repository,
            hasher,
            key_generator,
        }
    }

    /// Register a new account and issue its first API key
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<RegisteredUser, DomainError> {
        validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        let email = normalize_email(email);

        if self.repository.email_exists(&email).await? {
            return Err(DomainError::conflict("Email already registered"));
        }

        let password_hash = self.hasher.hash(password)?;
        let key = self.key_generator.generate();

        let user = User::new(&email, password_hash, key.hash, key.prefix);
        let user = self.repository.create(user).await?;

        info!(user_id = %user.id(), "Registered new account");

        Ok(RegisteredUser {
            user,
            api_key: key.key,
        })
    }

    /// Authenticate with email and password
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.get_by_email(&normalize_email(email)).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            debug!(user_id = %user.id(), "Password verification failed");
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Resolve the account owning a plaintext API key
    pub async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError> {
        if api_key.is_empty() {
            return Ok(None);
        }

        self.repository.get_by_api_key_hash(&hash_key(api_key)).await
    }

    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Replace an account's API key. The previous key stops working immediately.
    #[instrument(skip(self))]
    pub async fn rotate_api_key(&self, id: &UserId) -> Result<String, DomainError> {
        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        let key = self.key_generator.generate();
        user.set_api_key(key.hash, key.prefix);
        self.repository.update(&user).await?;

        info!(user_id = %id, "Rotated API key");

        Ok(key.key)
    }

    /// Count one request against the account's monthly quota
    pub async fn consume_quota(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<QuotaOutcome, DomainError> {
        self.repository.consume_quota(id, now).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::with_cost(1024, 1).unwrap()),
            ApiKeyGenerator::default(),
        )
    }

    #[tokio::test]
    async fn test_register() {
        let service = create_service();

        let registered = service
            .register("Dev@Example.com", "password123")
            .await
            .unwrap();

        assert_eq!(registered.user.email(), "dev@example.com");
        assert!(registered.api_key.starts_with("nla_live_"));
        assert!(registered.api_key.starts_with(registered.user.api_key_prefix()));
        assert_ne!(registered.user.password_hash(), "password123");
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service();
        service.register("dev@example.com", "password123").await.unwrap();

        let result = service.register("DEV@example.com", "password456").await;

        match result {
            Err(DomainError::Conflict { message }) => {
                assert_eq!(message, "Email already registered")
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = create_service();

        let result = service.register("not-an-email", "password123").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = service.register("dev@example.com", "short").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = create_service();
        service.register("dev@example.com", "password123").await.unwrap();

        let user = service
            .authenticate("dev@example.com", "password123")
            .await
            .unwrap();
        assert!(user.is_some());

        let wrong = service
            .authenticate("dev@example.com", "wrong-password")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = service
            .authenticate("nobody@example.com", "password123")
            .await
            .unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn test_find_by_api_key() {
        let service = create_service();
        let registered = service.register("dev@example.com", "password123").await.unwrap();

        let found = service.find_by_api_key(&registered.api_key).await.unwrap();
        assert_eq!(found.unwrap().id(), registered.user.id());

        assert!(service.find_by_api_key("nla_live_bogus").await.unwrap().is_none());
        assert!(service.find_by_api_key("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rotate_api_key() {
        let service = create_service();
        let registered = service.register("dev@example.com", "password123").await.unwrap();

        let new_key = service.rotate_api_key(registered.user.id()).await.unwrap();

        assert_ne!(new_key, registered.api_key);
        assert!(service.find_by_api_key(&registered.api_key).await.unwrap().is_none());
        assert!(service.find_by_api_key(&new_key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rotate_unknown_user() {
        let service = create_service();
        let result = service.rotate_api_key(&UserId::new()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
