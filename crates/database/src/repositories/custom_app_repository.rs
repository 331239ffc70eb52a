use crate::pool::DbPool;
use async_trait::async_trait;
use services::{
    apps::ports::{
        CustomApp, CustomAppListing, CustomAppRepository, CustomAppUpdate, NewCustomApp,
    },
    CustomAppId, UserId,
};

pub struct PostgresCustomAppRepository {
    pool: DbPool,
}

impl PostgresCustomAppRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const APP_COLUMNS: &str = "id, teenager_id, app_name, icon, category, url, created_at";

fn app_from_row(row: &tokio_postgres::Row) -> CustomApp {
    CustomApp {
        id: row.get(0),
        teenager_id: row.get(1),
        app_name: row.get(2),
        icon: row.get(3),
        category: row.get(4),
        url: row.get(5),
        created_at: row.get(6),
    }
}

#[async_trait]
impl CustomAppRepository for PostgresCustomAppRepository {
    async fn create_app(&self, app: NewCustomApp) -> anyhow::Result<CustomApp> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                &format!(
                    "INSERT INTO custom_apps (teenager_id, app_name, icon, category, url)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING {APP_COLUMNS}"
                ),
                &[
                    &app.teenager_id,
                    &app.app_name,
                    &app.icon,
                    &app.category,
                    &app.url,
                ],
            )
            .await?;

        Ok(app_from_row(&row))
    }

    async fn get_app(&self, id: CustomAppId) -> anyhow::Result<Option<CustomApp>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!("SELECT {APP_COLUMNS} FROM custom_apps WHERE id = $1"),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(app_from_row))
    }

    async fn name_taken(
        &self,
        teenager_id: UserId,
        app_name: &str,
        exclude: Option<CustomAppId>,
    ) -> anyhow::Result<bool> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "SELECT EXISTS (
                     SELECT 1 FROM custom_apps
                     WHERE teenager_id = $1 AND app_name = $2
                       AND ($3::uuid IS NULL OR id <> $3)
                 )",
                &[&teenager_id, &app_name, &exclude],
            )
            .await?;

        Ok(row.get(0))
    }

    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<CustomApp>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!(
                    "SELECT {APP_COLUMNS} FROM custom_apps
                     WHERE teenager_id = $1
                     ORDER BY created_at DESC"
                ),
                &[&teenager_id],
            )
            .await?;

        Ok(rows.iter().map(app_from_row).collect())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<CustomAppListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT ca.id, ca.teenager_id, ca.app_name, ca.icon, ca.category,
                        ca.url, ca.created_at, teen.name
                 FROM custom_apps ca
                 JOIN users teen ON teen.id = ca.teenager_id
                 ORDER BY ca.created_at DESC",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| CustomAppListing {
                app: app_from_row(r),
                teenager_name: Some(r.get(7)),
            })
            .collect())
    }

    async fn update_app(
        &self,
        id: CustomAppId,
        update: CustomAppUpdate,
    ) -> anyhow::Result<CustomApp> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                &format!(
                    "UPDATE custom_apps
                     SET app_name = $2, icon = $3, category = $4, url = $5
                     WHERE id = $1
                     RETURNING {APP_COLUMNS}"
                ),
                &[
                    &id,
                    &update.app_name,
                    &update.icon,
                    &update.category,
                    &update.url,
                ],
            )
            .await?;

        Ok(app_from_row(&row))
    }

    async fn delete_app(&self, id: CustomAppId) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        client
            .execute("DELETE FROM custom_apps WHERE id = $1", &[&id])
            .await?;

        Ok(())
    }

    async fn hidden_apps(&self, teenager_id: UserId) -> anyhow::Result<Vec<String>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT app_name FROM hidden_apps WHERE teenager_id = $1 ORDER BY app_name",
                &[&teenager_id],
            )
            .await?;

        Ok(rows.iter().map(|r| r.get(0)).collect())
    }

    async fn is_hidden(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<bool> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "SELECT EXISTS (
                     SELECT 1 FROM hidden_apps WHERE teenager_id = $1 AND app_name = $2
                 )",
                &[&teenager_id, &app_name],
            )
            .await?;

        Ok(row.get(0))
    }

    async fn hide_app(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        client
            .execute(
                "INSERT INTO hidden_apps (teenager_id, app_name)
                 VALUES ($1, $2)
                 ON CONFLICT (teenager_id, app_name) DO NOTHING",
                &[&teenager_id, &app_name],
            )
            .await?;

        Ok(())
    }

    async fn unhide_app(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        client
            .execute(
                "DELETE FROM hidden_apps WHERE teenager_id = $1 AND app_name = $2",
                &[&teenager_id, &app_name],
            )
            .await?;

        Ok(())
    }
}
