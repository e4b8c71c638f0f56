use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{User, UserPatch};
use crate::database::repository::{RepositoryError, UserRepository};

/// Process-local repository backed by a `Vec` behind a tokio `RwLock`
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken(users: &[User], email: &str, except: Option<Uuid>) -> bool {
        users
            .iter()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.read().await.clone())
    }

    async fn find(&self, id: Uuid) -> Result<User, RepositoryError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if Self::email_taken(&users, &user.email, None) {
            return Err(RepositoryError::DuplicateEmail(user.email));
        }

        tracing::debug!("Inserted user {}", user.id);
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        if let Some(email) = patch.email.as_deref() {
            if Self::email_taken(&users, email, Some(id)) {
                return Err(RepositoryError::DuplicateEmail(email.to_string()));
            }
        }

        users[index].apply(patch);
        Ok(users[index].clone())
    }

    async fn delete(&self, id: Uuid) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        tracing::debug!("Deleted user {}", id);
        Ok(users.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> User {
        User::new("Ada".into(), "Lovelace".into(), "ada@example.com".into())
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(ada()).await.unwrap();

        assert_eq!(repo.find(user.id).await.unwrap(), user);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.insert(ada()).await.unwrap();

        let dup = User::new("Other".into(), "Person".into(), "ADA@example.com".into());
        assert_eq!(
            repo.insert(dup).await,
            Err(RepositoryError::DuplicateEmail("ADA@example.com".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_may_keep_own_email() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(ada()).await.unwrap();

        let patch = UserPatch { email: Some("Ada@Example.com".into()), ..Default::default() };
        let updated = repo.update(user.id, patch).await.unwrap();
        assert_eq!(updated.email, "Ada@Example.com");
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let repo = InMemoryUserRepository::new();
        let id = Uuid::new_v4();

        assert_eq!(repo.find(id).await, Err(RepositoryError::NotFound(id)));
        assert_eq!(repo.delete(id).await, Err(RepositoryError::NotFound(id)));
        assert_eq!(
            repo.update(id, UserPatch::default()).await,
            Err(RepositoryError::NotFound(id))
        );
    }

    #[tokio::test]
    async fn test_delete_removes() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(ada()).await.unwrap();

        repo.delete(user.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
