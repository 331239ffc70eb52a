use crate::pool::DbPool;
use async_trait::async_trait;
use services::{
    sites::ports::{BlockedSite, BlockedSiteListing, BlockedSiteRepository},
    BlockedSiteId, UserId,
};

pub struct PostgresBlockedSiteRepository {
    pool: DbPool,
}

impl PostgresBlockedSiteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn site_from_row(row: &tokio_postgres::Row) -> BlockedSite {
    BlockedSite {
        id: row.get(0),
        parent_id: row.get(1),
        teenager_id: row.get(2),
        site_url: row.get(3),
        created_at: row.get(4),
    }
}

#[async_trait]
impl BlockedSiteRepository for PostgresBlockedSiteRepository {
    async fn create_site(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        site_url: &str,
    ) -> anyhow::Result<BlockedSite> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "INSERT INTO blocked_sites (parent_id, teenager_id, site_url)
                 VALUES ($1, $2, $3)
                 RETURNING id, parent_id, teenager_id, site_url, created_at",
                &[&parent_id, &teenager_id, &site_url],
            )
            .await?;

        Ok(site_from_row(&row))
    }

    async fn site_exists(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        site_url: &str,
    ) -> anyhow::Result<bool> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "SELECT EXISTS (
                     SELECT 1 FROM blocked_sites
                     WHERE parent_id = $1 AND teenager_id = $2 AND site_url = $3
                 )",
                &[&parent_id, &teenager_id, &site_url],
            )
            .await?;

        Ok(row.get(0))
    }

    async fn list_for_parent(&self, parent_id: UserId) -> anyhow::Result<Vec<BlockedSiteListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT bs.id, bs.parent_id, bs.teenager_id, bs.site_url, bs.created_at, teen.name
                 FROM blocked_sites bs
                 JOIN users teen ON teen.id = bs.teenager_id
                 WHERE bs.parent_id = $1
                 ORDER BY bs.created_at DESC",
                &[&parent_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| BlockedSiteListing {
                site: site_from_row(r),
                teenager_name: r.get(5),
            })
            .collect())
    }

    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<BlockedSite>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT id, parent_id, teenager_id, site_url, created_at
                 FROM blocked_sites
                 WHERE teenager_id = $1
                 ORDER BY created_at DESC",
                &[&teenager_id],
            )
            .await?;

        Ok(rows.iter().map(site_from_row).collect())
    }

    async fn delete_for_parent(
        &self,
        id: BlockedSiteId,
        parent_id: UserId,
    ) -> anyhow::Result<u64> {
        let client = self.pool.get().await?;

        let removed = client
            .execute(
                "DELETE FROM blocked_sites WHERE id = $1 AND parent_id = $2",
                &[&id, &parent_id],
            )
            .await?;

        Ok(removed)
    }
}
