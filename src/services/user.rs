use std::sync::Arc;

use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::User;
use crate::repository::UserRepository;
use crate::validation::validate_email;

/// User business rules: email validation, password hashing, lookup normalisation.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

fn invalid_email() -> AppError {
    AppError::ValidationError("invalid email format".into())
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Looks a user up by id. Any repository failure is reported as not found.
    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        self.repo.get_user_by_id(id).await.map_err(|e| {
            log::debug!("get_user({}) failed: {}", id, e);
            AppError::NotFound("user not found".into())
        })
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, AppError> {
        if !validate_email(email) {
            return Err(invalid_email());
        }
        self.repo.get_user_by_email(email).await
    }

    /// Validates the email, hashes the password and stores the new user.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if !validate_email(email) {
            return Err(invalid_email());
        }
        let password_hash = hash_password(password).map_err(|e| {
            log::error!("{}", e);
            AppError::InternalServerError("internal server error".into())
        })?;
        self.repo.create_user(username, email, &password_hash).await
    }

    pub async fn update_user(&self, id: i64, username: &str, email: &str) -> Result<User, AppError> {
        if !validate_email(email) {
            return Err(invalid_email());
        }
        self.repo.update_user(id, username, email).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        self.repo.delete_user(id).await
    }

    /// Checks a login attempt. Unknown email and wrong password produce the
    /// same `Unauthorized` error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let invalid_credentials = || AppError::Unauthorized("invalid credentials".into());

        let user = match self.get_user_by_email(email).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => return Err(invalid_credentials()),
            Err(e) => return Err(e),
        };

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            log::warn!("failed login for user {}", user.id);
            Err(invalid_credentials())
        }
    }
}
