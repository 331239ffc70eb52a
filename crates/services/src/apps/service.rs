use async_trait::async_trait;
use std::sync::Arc;

use super::ports::{
    CustomApp, CustomAppListing, CustomAppRepository, CustomAppService, CustomAppUpdate,
    NewCustomApp, DEFAULT_APP_CATEGORY, DEFAULT_APP_ICON,
};
use crate::auth::ports::{Caller, Role, UserRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::types::{CustomAppId, UserId};
use crate::usage::MIN_APP_NAME_LEN;

pub struct CustomAppServiceImpl {
    app_repository: Arc<dyn CustomAppRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl CustomAppServiceImpl {
    pub fn new(
        app_repository: Arc<dyn CustomAppRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            app_repository,
            user_repository,
        }
    }
}

/// Validates the user-supplied name and URL, filling in icon and category
/// defaults. Returns the trimmed name and normalized URL.
fn validate_app_fields(
    app_name: &str,
    url: &str,
    icon: Option<String>,
    category: Option<String>,
) -> ServiceResult<(String, String, String, String)> {
    let app_name = app_name.trim();
    if app_name.len() < MIN_APP_NAME_LEN {
        return Err(ServiceError::validation(
            "App name must be at least 2 characters",
        ));
    }
    let url = url.trim();
    url::Url::parse(url).map_err(|_| ServiceError::validation("Invalid URL"))?;

    let icon = icon
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| DEFAULT_APP_ICON.to_string());
    let category = category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_APP_CATEGORY.to_string());

    Ok((app_name.to_string(), url.to_string(), icon, category))
}

#[async_trait]
impl CustomAppService for CustomAppServiceImpl {
    async fn my_apps(&self, caller: Caller) -> ServiceResult<Vec<CustomApp>> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization("Teenager account required"));
        }
        Ok(self.app_repository.list_for_teenager(caller.user_id).await?)
    }

    async fn all_apps(&self, caller: Caller) -> ServiceResult<Vec<CustomAppListing>> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization("Parent account required"));
        }
        Ok(self.app_repository.list_all().await?)
    }

    async fn apps_for_teenager(
        &self,
        caller: Caller,
        teenager_id: UserId,
    ) -> ServiceResult<Vec<CustomApp>> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization("Parent account required"));
        }
        self.user_repository
            .get_user_with_role(teenager_id, Role::Teenager)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teenager not found"))?;
        Ok(self.app_repository.list_for_teenager(teenager_id).await?)
    }

    async fn create_app(
        &self,
        caller: Caller,
        app_name: &str,
        url: &str,
        icon: Option<String>,
        category: Option<String>,
    ) -> ServiceResult<CustomApp> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization(
                "Only teenagers can add custom apps",
            ));
        }
        let (app_name, url, icon, category) = validate_app_fields(app_name, url, icon, category)?;

        if self
            .app_repository
            .name_taken(caller.user_id, &app_name, None)
            .await?
        {
            return Err(ServiceError::conflict(
                "An app with this name already exists",
            ));
        }

        let app = self
            .app_repository
            .create_app(NewCustomApp {
                teenager_id: caller.user_id,
                app_name,
                icon,
                category,
                url,
            })
            .await?;
        tracing::info!("Teen {} added custom app {}", caller.user_id, app.app_name);
        Ok(app)
    }

    async fn update_app(
        &self,
        caller: Caller,
        id: CustomAppId,
        app_name: &str,
        url: &str,
        icon: Option<String>,
        category: Option<String>,
    ) -> ServiceResult<CustomApp> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization(
                "Only teenagers can edit custom apps",
            ));
        }
        let (app_name, url, icon, category) = validate_app_fields(app_name, url, icon, category)?;

        self.app_repository
            .get_app(id)
            .await?
            .filter(|a| a.teenager_id == caller.user_id)
            .ok_or_else(|| ServiceError::not_found("App not found"))?;

        if self
            .app_repository
            .name_taken(caller.user_id, &app_name, Some(id))
            .await?
        {
            return Err(ServiceError::conflict(
                "An app with this name already exists",
            ));
        }

        Ok(self
            .app_repository
            .update_app(
                id,
                CustomAppUpdate {
                    app_name,
                    icon,
                    category,
                    url,
                },
            )
            .await?)
    }

    async fn delete_app(&self, caller: Caller, id: CustomAppId) -> ServiceResult<()> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization(
                "Only teenagers can delete custom apps",
            ));
        }
        let app = self
            .app_repository
            .get_app(id)
            .await?
            .filter(|a| a.teenager_id == caller.user_id)
            .ok_or_else(|| ServiceError::not_found("App not found"))?;
        self.app_repository.delete_app(app.id).await?;
        Ok(())
    }

    async fn hidden_apps(&self, caller: Caller) -> ServiceResult<Vec<String>> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization("Teenager account required"));
        }
        Ok(self.app_repository.hidden_apps(caller.user_id).await?)
    }

    async fn hide_app(&self, caller: Caller, app_name: &str) -> ServiceResult<()> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization("Teenager account required"));
        }
        let app_name = app_name.trim();
        if app_name.len() < MIN_APP_NAME_LEN {
            return Err(ServiceError::validation(
                "App name must be at least 2 characters",
            ));
        }
        if self.app_repository.is_hidden(caller.user_id, app_name).await? {
            return Err(ServiceError::conflict("App is already hidden"));
        }
        self.app_repository.hide_app(caller.user_id, app_name).await?;
        Ok(())
    }

    async fn unhide_app(&self, caller: Caller, app_name: &str) -> ServiceResult<()> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization("Teenager account required"));
        }
        self.app_repository
            .unhide_app(caller.user_id, app_name.trim())
            .await?;
        Ok(())
    }
}
