use crate::pool::DbPool;
use async_trait::async_trait;
use services::{
    limits::ports::{AppLimit, AppLimitListing, AppLimitRepository, LimitWrite},
    AppLimitId, UserId,
};

pub struct PostgresAppLimitRepository {
    pool: DbPool,
}

impl PostgresAppLimitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const LIMIT_COLUMNS: &str =
    "id, parent_id, teenager_id, app_name, daily_limit_minutes, created_at";

fn limit_from_row(row: &tokio_postgres::Row) -> AppLimit {
    AppLimit {
        id: row.get(0),
        parent_id: row.get(1),
        teenager_id: row.get(2),
        app_name: row.get(3),
        daily_limit_minutes: row.get(4),
        created_at: row.get(5),
    }
}

#[async_trait]
impl AppLimitRepository for PostgresAppLimitRepository {
    async fn list_for_parent(&self, parent_id: UserId) -> anyhow::Result<Vec<AppLimitListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT al.id, al.parent_id, al.teenager_id, al.app_name,
                        al.daily_limit_minutes, al.created_at, teen.name
                 FROM app_limits al
                 JOIN users teen ON teen.id = al.teenager_id
                 WHERE al.parent_id = $1
                 ORDER BY al.created_at DESC",
                &[&parent_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| AppLimitListing {
                limit: limit_from_row(r),
                teenager_name: Some(r.get(6)),
            })
            .collect())
    }

    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<AppLimit>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!(
                    "SELECT {LIMIT_COLUMNS} FROM app_limits
                     WHERE teenager_id = $1
                     ORDER BY created_at DESC"
                ),
                &[&teenager_id],
            )
            .await?;

        Ok(rows.iter().map(limit_from_row).collect())
    }

    async fn get_limit(
        &self,
        teenager_id: UserId,
        app_name: &str,
    ) -> anyhow::Result<Option<AppLimit>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!(
                    "SELECT {LIMIT_COLUMNS} FROM app_limits
                     WHERE teenager_id = $1 AND app_name = $2"
                ),
                &[&teenager_id, &app_name],
            )
            .await?;

        Ok(row.as_ref().map(limit_from_row))
    }

    async fn upsert_limit(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        app_name: &str,
        daily_limit_minutes: i32,
    ) -> anyhow::Result<LimitWrite> {
        let client = self.pool.get().await?;

        // xmax = 0 distinguishes a fresh insert from a conflict update.
        let row = client
            .query_one(
                "INSERT INTO app_limits (parent_id, teenager_id, app_name, daily_limit_minutes)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (teenager_id, app_name) DO UPDATE
                   SET daily_limit_minutes = EXCLUDED.daily_limit_minutes,
                       parent_id = EXCLUDED.parent_id
                 RETURNING (xmax = 0)",
                &[&parent_id, &teenager_id, &app_name, &daily_limit_minutes],
            )
            .await?;

        let inserted: bool = row.get(0);
        Ok(if inserted {
            LimitWrite::Created
        } else {
            LimitWrite::Updated
        })
    }

    async fn get_for_parent(
        &self,
        id: AppLimitId,
        parent_id: UserId,
    ) -> anyhow::Result<Option<AppLimit>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!(
                    "SELECT {LIMIT_COLUMNS} FROM app_limits
                     WHERE id = $1 AND parent_id = $2"
                ),
                &[&id, &parent_id],
            )
            .await?;

        Ok(row.as_ref().map(limit_from_row))
    }

    async fn delete_limit(&self, id: AppLimitId) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        client
            .execute("DELETE FROM app_limits WHERE id = $1", &[&id])
            .await?;

        Ok(())
    }
}
