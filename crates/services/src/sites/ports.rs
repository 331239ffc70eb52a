use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::ports::Caller;
use crate::error::ServiceResult;
use crate::types::{BlockedSiteId, UserId};

/// A site a parent has blocked for one of their teenagers.
#[derive(Debug, Clone)]
pub struct BlockedSite {
    pub id: BlockedSiteId,
    pub parent_id: UserId,
    pub teenager_id: UserId,
    pub site_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BlockedSiteListing {
    pub site: BlockedSite,
    pub teenager_name: Option<String>,
}

#[async_trait]
pub trait BlockedSiteRepository: Send + Sync {
    async fn create_site(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        site_url: &str,
    ) -> anyhow::Result<BlockedSite>;
    async fn site_exists(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        site_url: &str,
    ) -> anyhow::Result<bool>;
    async fn list_for_parent(&self, parent_id: UserId) -> anyhow::Result<Vec<BlockedSiteListing>>;
    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<BlockedSite>>;
    async fn delete_for_parent(&self, id: BlockedSiteId, parent_id: UserId)
        -> anyhow::Result<u64>;
}

#[async_trait]
pub trait BlockedSiteService: Send + Sync {
    async fn list_sites(&self, caller: Caller) -> ServiceResult<Vec<BlockedSiteListing>>;
    async fn block_site(
        &self,
        caller: Caller,
        site_url: &str,
        teenager_id: UserId,
    ) -> ServiceResult<BlockedSite>;
    async fn unblock_site(&self, caller: Caller, id: BlockedSiteId) -> ServiceResult<()>;
}
