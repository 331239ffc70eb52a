use crate::pool::DbPool;
use async_trait::async_trait;
use chrono::NaiveDate;
use services::{
    usage::ports::{DateWindow, UsageRepository, UsageRow},
    UserId,
};

pub struct PostgresUsageRepository {
    pool: DbPool,
}

impl PostgresUsageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageRepository for PostgresUsageRepository {
    async fn add_usage(
        &self,
        teenager_id: UserId,
        app_name: &str,
        minutes: i32,
        date: NaiveDate,
    ) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        // Single atomic statement; concurrent writers for the same key both
        // land their increments.
        client
            .execute(
                r#"
                INSERT INTO app_usage (teenager_id, app_name, usage_date, usage_minutes)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (teenager_id, app_name, usage_date) DO UPDATE
                  SET usage_minutes = app_usage.usage_minutes + EXCLUDED.usage_minutes,
                      updated_at = NOW()
                "#,
                &[&teenager_id, &app_name, &date, &minutes],
            )
            .await?;

        Ok(())
    }

    async fn total_for_day(
        &self,
        teenager_id: UserId,
        app_name: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Option<i32>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                "SELECT usage_minutes FROM app_usage
                 WHERE teenager_id = $1 AND app_name = $2 AND usage_date = $3",
                &[&teenager_id, &app_name, &date],
            )
            .await?;

        Ok(row.map(|r| r.get(0)))
    }

    async fn usage_in_window(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<UsageRow>> {
        let client = self.pool.get().await?;

        let rows = match window {
            DateWindow::On(date) => {
                client
                    .query(
                        "SELECT app_name, usage_date, usage_minutes FROM app_usage
                         WHERE teenager_id = $1 AND usage_date = $2
                         ORDER BY app_name",
                        &[&teenager_id, &date],
                    )
                    .await?
            }
            DateWindow::Since(start) => {
                client
                    .query(
                        "SELECT app_name, usage_date, usage_minutes FROM app_usage
                         WHERE teenager_id = $1 AND usage_date >= $2
                         ORDER BY usage_date DESC, app_name",
                        &[&teenager_id, &start],
                    )
                    .await?
            }
        };

        Ok(rows
            .iter()
            .map(|r| UsageRow {
                app_name: r.get(0),
                usage_date: r.get(1),
                usage_minutes: r.get(2),
            })
            .collect())
    }
}
