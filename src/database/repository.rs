use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{User, UserPatch};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),
}

/// Storage for users. Emails are unique, compared case-insensitively.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// All users in insertion order
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find(&self, id: Uuid) -> Result<User, RepositoryError>;

    async fn insert(&self, user: User) -> Result<User, RepositoryError>;

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, RepositoryError>;

    /// Remove and return the user
    async fn delete(&self, id: Uuid) -> Result<User, RepositoryError>;
}
