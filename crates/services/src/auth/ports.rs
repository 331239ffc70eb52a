use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;
use crate::types::{SessionId, UserId};

/// Account role. Teenagers carry an optional reference to their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum Role {
    Parent,
    Teenager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Teenager => "teenager",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "parent" => Some(Role::Parent),
            "teenager" => Some(Role::Teenager),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated identity a request is executed on behalf of.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn parent(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Parent,
        }
    }

    pub fn teenager(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Teenager,
        }
    }
}

/// A user record as stored. The password hash never leaves the services layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub parent_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user, safe to return to clients.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Minimal account listing used for teenager registration and task assignment.
#[derive(Debug, Clone)]
pub struct AccountListing {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub parent_id: Option<UserId>,
}

/// An issued session. `token` is populated only at creation time; storage
/// keeps a sha256 hash of it.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub parent_id: Option<UserId>,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: UserSummary,
    pub session: UserSession,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User>;
    async fn get_user(&self, user_id: UserId) -> anyhow::Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn list_parents(&self) -> anyhow::Result<Vec<AccountListing>>;
    async fn list_teenagers(&self) -> anyhow::Result<Vec<AccountListing>>;
    /// Returns the user only when it exists with the given role.
    async fn get_user_with_role(&self, user_id: UserId, role: Role)
        -> anyhow::Result<Option<User>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, user_id: UserId, ttl_days: i64) -> anyhow::Result<UserSession>;
    async fn get_session_by_token_hash(
        &self,
        token_hash: String,
    ) -> anyhow::Result<Option<UserSession>>;
    async fn delete_session(&self, session_id: SessionId) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, params: RegisterParams) -> ServiceResult<AuthenticatedSession>;
    async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthenticatedSession>;
    async fn logout(&self, session_id: SessionId) -> ServiceResult<()>;
    async fn current_user(&self, user_id: UserId) -> ServiceResult<UserSummary>;
    async fn list_parents(&self) -> ServiceResult<Vec<AccountListing>>;
}
