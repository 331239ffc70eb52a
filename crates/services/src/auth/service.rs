use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use std::sync::Arc;

use super::ports::{
    AccountListing, AuthService, AuthenticatedSession, NewUser, RegisterParams, Role,
    SessionRepository, UserRepository, UserSummary,
};
use crate::error::{ServiceError, ServiceResult};
use crate::types::{SessionId, UserId};

pub struct AuthServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    session_repository: Arc<dyn SessionRepository>,
    session_ttl_days: i64,
}

impl AuthServiceImpl {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        session_repository: Arc<dyn SessionRepository>,
        session_ttl_days: i64,
    ) -> Self {
        Self {
            user_repository,
            session_repository,
            session_ttl_days,
        }
    }

    fn hash_password(password: &str) -> ServiceResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
        Ok(hash.to_string())
    }

    fn verify_password(password: &str, stored_hash: &str) -> ServiceResult<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| anyhow::anyhow!("stored password hash is malformed: {e}"))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow::anyhow!("password verification failed: {e}").into()),
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, params: RegisterParams) -> ServiceResult<AuthenticatedSession> {
        if params.name.trim().is_empty() || params.email.trim().is_empty() {
            return Err(ServiceError::validation("Name and email are required"));
        }
        if params.password.is_empty() {
            return Err(ServiceError::validation("Password is required"));
        }
        // Teenager accounts must be linked to a parent at creation time.
        if params.role == Role::Teenager && params.parent_id.is_none() {
            return Err(ServiceError::validation(
                "Parent ID is required for teenager accounts",
            ));
        }

        if self
            .user_repository
            .get_user_by_email(&params.email)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict("User already exists"));
        }

        let password_hash = Self::hash_password(&params.password)?;
        let parent_id = match params.role {
            Role::Teenager => params.parent_id,
            Role::Parent => None,
        };

        let user = self
            .user_repository
            .create_user(NewUser {
                name: params.name,
                email: params.email,
                password_hash,
                role: params.role,
                parent_id,
            })
            .await?;

        tracing::info!("Registered {} account {}", user.role, user.id);

        let session = self
            .session_repository
            .create_session(user.id, self.session_ttl_days)
            .await?;

        Ok(AuthenticatedSession {
            user: user.into(),
            session,
        })
    }

    async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthenticatedSession> {
        if email.is_empty() || password.is_empty() {
            return Err(ServiceError::validation("Email and password are required"));
        }

        // Same message for unknown email and wrong password, so callers
        // cannot probe which accounts exist.
        let user = self
            .user_repository
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::authorization("Invalid credentials"))?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(ServiceError::authorization("Invalid credentials"));
        }

        let session = self
            .session_repository
            .create_session(user.id, self.session_ttl_days)
            .await?;

        tracing::info!("User {} logged in", user.id);

        Ok(AuthenticatedSession {
            user: user.into(),
            session,
        })
    }

    async fn logout(&self, session_id: SessionId) -> ServiceResult<()> {
        self.session_repository.delete_session(session_id).await?;
        Ok(())
    }

    async fn current_user(&self, user_id: UserId) -> ServiceResult<UserSummary> {
        let user = self
            .user_repository
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;
        Ok(user.into())
    }

    async fn list_parents(&self) -> ServiceResult<Vec<AccountListing>> {
        Ok(self.user_repository.list_parents().await?)
    }
}
