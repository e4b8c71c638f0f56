use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{NewUser, User, UserPatch};
use crate::database::{InMemoryUserRepository, UserRepository};
use crate::error::ApiError;
use crate::signal::FailureSignal;
use crate::validation::FieldErrors;

const NAME_MAX_LENGTH: usize = 100;
const EMAIL_MAX_LENGTH: usize = 254;

/// Business rules for users. Raises failure signals; never builds responses.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryUserRepository::new()))
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.repository.list().await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<User, ApiError> {
        Ok(self.repository.find(id).await?)
    }

    pub async fn create(&self, input: NewUser) -> Result<User, ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require("first_name", input.first_name.as_deref())
            .max_length("first_name", input.first_name.as_deref(), NAME_MAX_LENGTH)
            .require("last_name", input.last_name.as_deref())
            .max_length("last_name", input.last_name.as_deref(), NAME_MAX_LENGTH)
            .require("email", input.email.as_deref())
            .max_length("email", input.email.as_deref(), EMAIL_MAX_LENGTH)
            .email("email", input.email.as_deref());
        errors.into_result("User failed validation")?;

        // All three are present and non-blank past validation
        let user = User::new(
            trimmed(input.first_name),
            trimmed(input.last_name),
            trimmed(input.email),
        );

        let user = self.repository.insert(user).await?;
        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, ApiError> {
        if patch.is_empty() {
            return Err(FailureSignal::bad_request(
                "Patch must set at least one of first_name, last_name, email",
            )
            .into());
        }

        // Present fields follow the same rules as on create
        let mut errors = FieldErrors::new();
        if let Some(first_name) = patch.first_name.as_deref() {
            errors
                .require("first_name", Some(first_name))
                .max_length("first_name", Some(first_name), NAME_MAX_LENGTH);
        }
        if let Some(last_name) = patch.last_name.as_deref() {
            errors
                .require("last_name", Some(last_name))
                .max_length("last_name", Some(last_name), NAME_MAX_LENGTH);
        }
        if let Some(email) = patch.email.as_deref() {
            errors
                .require("email", Some(email))
                .max_length("email", Some(email), EMAIL_MAX_LENGTH)
                .email("email", Some(email));
        }
        errors.into_result("User failed validation")?;

        let patch = UserPatch {
            first_name: patch.first_name.map(|v| v.trim().to_string()),
            last_name: patch.last_name.map(|v| v.trim().to_string()),
            email: patch.email.map(|v| v.trim().to_string()),
        };

        let user = self.repository.update(id, patch).await?;
        tracing::info!("Updated user {}", user.id);
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<User, ApiError> {
        let user = self.repository.delete(id).await?;
        tracing::info!("Deleted user {}", user.id);
        Ok(user)
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
