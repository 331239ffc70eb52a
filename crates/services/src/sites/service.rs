use async_trait::async_trait;
use std::sync::Arc;

use super::ports::{BlockedSite, BlockedSiteListing, BlockedSiteRepository, BlockedSiteService};
use crate::auth::ports::{Caller, Role, UserRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::types::{BlockedSiteId, UserId};

pub struct BlockedSiteServiceImpl {
    site_repository: Arc<dyn BlockedSiteRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl BlockedSiteServiceImpl {
    pub fn new(
        site_repository: Arc<dyn BlockedSiteRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            site_repository,
            user_repository,
        }
    }
}

#[async_trait]
impl BlockedSiteService for BlockedSiteServiceImpl {
    async fn list_sites(&self, caller: Caller) -> ServiceResult<Vec<BlockedSiteListing>> {
        match caller.role {
            Role::Parent => Ok(self.site_repository.list_for_parent(caller.user_id).await?),
            Role::Teenager => {
                let sites = self
                    .site_repository
                    .list_for_teenager(caller.user_id)
                    .await?;
                Ok(sites
                    .into_iter()
                    .map(|site| BlockedSiteListing {
                        site,
                        teenager_name: None,
                    })
                    .collect())
            }
        }
    }

    async fn block_site(
        &self,
        caller: Caller,
        site_url: &str,
        teenager_id: UserId,
    ) -> ServiceResult<BlockedSite> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization("Only parents can block sites"));
        }
        let site_url = site_url.trim();
        if site_url.is_empty() {
            return Err(ServiceError::validation("Site URL is required"));
        }

        let teen = self
            .user_repository
            .get_user_with_role(teenager_id, Role::Teenager)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teenager not found"))?;
        if teen.parent_id != Some(caller.user_id) {
            return Err(ServiceError::authorization(
                "You can only block sites for your own teenagers",
            ));
        }

        if self
            .site_repository
            .site_exists(caller.user_id, teenager_id, site_url)
            .await?
        {
            return Err(ServiceError::conflict("This site is already blocked"));
        }

        let site = self
            .site_repository
            .create_site(caller.user_id, teenager_id, site_url)
            .await?;
        tracing::info!("Parent {} blocked {}", caller.user_id, site.site_url);
        Ok(site)
    }

    async fn unblock_site(&self, caller: Caller, id: BlockedSiteId) -> ServiceResult<()> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization(
                "Only parents can unblock sites",
            ));
        }
        let removed = self
            .site_repository
            .delete_for_parent(id, caller.user_id)
            .await?;
        if removed == 0 {
            return Err(ServiceError::not_found("Blocked site not found"));
        }
        Ok(())
    }
}
