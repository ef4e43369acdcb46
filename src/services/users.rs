//! User management service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all users
    pub async fn get_all(&self) -> AppResult<Vec<User>> {
        self.repository.users.get_all().await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Register a new user
    pub async fn create(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let created = self.repository.users.create(&user).await?;
        tracing::info!("Registered user {} <{}>", created.id, created.email);
        Ok(created)
    }

    /// Partially update a user's name and email
    pub async fn update(&self, id: i64, user: UpdateUser) -> AppResult<User> {
        // Check if user exists
        self.repository.users.get_by_id(id).await?;

        if let Some(ref email) = user.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        self.repository
            .users
            .update(id, user.name.as_deref(), user.email.as_deref())
            .await
    }

    /// Delete a user
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.users.get_by_id(id).await?;
        self.repository.users.delete(id).await
    }
}
