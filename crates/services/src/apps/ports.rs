use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::ports::Caller;
use crate::error::ServiceResult;
use crate::types::{CustomAppId, UserId};

pub const DEFAULT_APP_ICON: &str = "📱";
pub const DEFAULT_APP_CATEGORY: &str = "Other";

/// An app a teenager added to their own catalog.
#[derive(Debug, Clone)]
pub struct CustomApp {
    pub id: CustomAppId,
    pub teenager_id: UserId,
    pub app_name: String,
    pub icon: String,
    pub category: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CustomAppListing {
    pub app: CustomApp,
    pub teenager_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCustomApp {
    pub teenager_id: UserId,
    pub app_name: String,
    pub icon: String,
    pub category: String,
    pub url: String,
}

/// Fields a teenager may change on an existing app.
#[derive(Debug, Clone)]
pub struct CustomAppUpdate {
    pub app_name: String,
    pub icon: String,
    pub category: String,
    pub url: String,
}

#[async_trait]
pub trait CustomAppRepository: Send + Sync {
    async fn create_app(&self, app: NewCustomApp) -> anyhow::Result<CustomApp>;
    async fn get_app(&self, id: CustomAppId) -> anyhow::Result<Option<CustomApp>>;
    async fn name_taken(
        &self,
        teenager_id: UserId,
        app_name: &str,
        exclude: Option<CustomAppId>,
    ) -> anyhow::Result<bool>;
    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<CustomApp>>;
    async fn list_all(&self) -> anyhow::Result<Vec<CustomAppListing>>;
    async fn update_app(&self, id: CustomAppId, update: CustomAppUpdate)
        -> anyhow::Result<CustomApp>;
    async fn delete_app(&self, id: CustomAppId) -> anyhow::Result<()>;

    async fn hidden_apps(&self, teenager_id: UserId) -> anyhow::Result<Vec<String>>;
    async fn is_hidden(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<bool>;
    async fn hide_app(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<()>;
    /// Idempotent; unhiding an app that is not hidden is a no-op.
    async fn unhide_app(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<()>;
}

#[async_trait]
pub trait CustomAppService: Send + Sync {
    async fn my_apps(&self, caller: Caller) -> ServiceResult<Vec<CustomApp>>;
    async fn all_apps(&self, caller: Caller) -> ServiceResult<Vec<CustomAppListing>>;
    async fn apps_for_teenager(
        &self,
        caller: Caller,
        teenager_id: UserId,
    ) -> ServiceResult<Vec<CustomApp>>;
    async fn create_app(
        &self,
        caller: Caller,
        app_name: &str,
        url: &str,
        icon: Option<String>,
        category: Option<String>,
    ) -> ServiceResult<CustomApp>;
    async fn update_app(
        &self,
        caller: Caller,
        id: CustomAppId,
        app_name: &str,
        url: &str,
        icon: Option<String>,
        category: Option<String>,
    ) -> ServiceResult<CustomApp>;
    async fn delete_app(&self, caller: Caller, id: CustomAppId) -> ServiceResult<()>;

    async fn hidden_apps(&self, caller: Caller) -> ServiceResult<Vec<String>>;
    async fn hide_app(&self, caller: Caller, app_name: &str) -> ServiceResult<()>;
    async fn unhide_app(&self, caller: Caller, app_name: &str) -> ServiceResult<()>;
}
