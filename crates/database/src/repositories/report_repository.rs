use crate::pool::DbPool;
use async_trait::async_trait;
use chrono::NaiveDate;
use services::{
    report::ports::{
        AppSummary, BlockedSiteEntry, CategoryTime, ParentAppSummary, ParentUsageRow,
        ReportRepository, TaskStats, TodayUsage,
    },
    usage::ports::{DateWindow, UsageRow},
    UserId,
};

pub struct PostgresReportRepository {
    pool: DbPool,
}

impl PostgresReportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// SQL comparison for a window against an `usage_date` column. Both variants
/// bind a single date parameter.
fn window_clause(window: DateWindow) -> (&'static str, NaiveDate) {
    match window {
        DateWindow::On(date) => ("=", date),
        DateWindow::Since(start) => (">=", start),
    }
}

fn task_stats_from_row(row: &tokio_postgres::Row) -> TaskStats {
    TaskStats {
        total_tasks: row.get(0),
        completed_tasks: row.get(1),
        in_progress_tasks: row.get(2),
        pending_tasks: row.get(3),
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn daily_usage(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<UsageRow>> {
        let client = self.pool.get().await?;
        let (op, date) = window_clause(window);

        let rows = client
            .query(
                &format!(
                    "SELECT app_name, usage_date, usage_minutes FROM app_usage
                     WHERE teenager_id = $1 AND usage_date {op} $2
                     ORDER BY usage_date DESC, app_name"
                ),
                &[&teenager_id, &date],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| UsageRow {
                app_name: r.get(0),
                usage_date: r.get(1),
                usage_minutes: r.get(2),
            })
            .collect())
    }

    async fn app_summary(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<AppSummary>> {
        let client = self.pool.get().await?;
        let (op, date) = window_clause(window);

        // AVG over int is NUMERIC; cast so it maps to f64.
        let rows = client
            .query(
                &format!(
                    "SELECT au.app_name,
                            SUM(au.usage_minutes)::bigint,
                            AVG(au.usage_minutes)::float8,
                            COUNT(DISTINCT au.usage_date),
                            al.daily_limit_minutes
                     FROM app_usage au
                     LEFT JOIN app_limits al
                       ON al.teenager_id = au.teenager_id AND al.app_name = au.app_name
                     WHERE au.teenager_id = $1 AND au.usage_date {op} $2
                     GROUP BY au.app_name, al.daily_limit_minutes
                     ORDER BY SUM(au.usage_minutes) DESC"
                ),
                &[&teenager_id, &date],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| AppSummary {
                app_name: r.get(0),
                total_minutes: r.get(1),
                avg_minutes: r.get(2),
                days_used: r.get(3),
                daily_limit_minutes: r.get(4),
            })
            .collect())
    }

    async fn today_usage(
        &self,
        teenager_id: UserId,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<TodayUsage>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT au.app_name, au.usage_minutes, au.usage_date,
                        al.daily_limit_minutes, au.updated_at
                 FROM app_usage au
                 LEFT JOIN app_limits al
                   ON al.teenager_id = au.teenager_id AND al.app_name = au.app_name
                 WHERE au.teenager_id = $1 AND au.usage_date = $2
                 ORDER BY au.app_name",
                &[&teenager_id, &date],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| TodayUsage {
                app_name: r.get(0),
                usage_minutes: r.get(1),
                usage_date: r.get(2),
                daily_limit_minutes: r.get(3),
                updated_at: r.get(4),
            })
            .collect())
    }

    async fn task_stats_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<TaskStats> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "SELECT COUNT(*),
                        COUNT(*) FILTER (WHERE status = 'completed'),
                        COUNT(*) FILTER (WHERE status = 'in_progress'),
                        COUNT(*) FILTER (WHERE status = 'pending')
                 FROM tasks WHERE teenager_id = $1",
                &[&teenager_id],
            )
            .await?;

        Ok(task_stats_from_row(&row))
    }

    async fn blocked_sites_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<BlockedSiteEntry>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT bs.id, bs.site_url, bs.created_at
                 FROM blocked_sites bs
                 WHERE bs.teenager_id = $1
                 ORDER BY bs.created_at DESC",
                &[&teenager_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| BlockedSiteEntry {
                id: r.get(0),
                site_url: r.get(1),
                created_at: r.get(2),
                teenager_id: None,
                teenager_name: None,
            })
            .collect())
    }

    async fn parent_usage(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<ParentUsageRow>> {
        let client = self.pool.get().await?;
        let (op, date) = window_clause(window);

        let rows = client
            .query(
                &format!(
                    "SELECT au.app_name, au.usage_date, au.usage_minutes,
                            al.daily_limit_minutes, u.id, u.name
                     FROM app_usage au
                     JOIN users u ON u.id = au.teenager_id AND u.role = 'teenager'
                     LEFT JOIN app_limits al
                       ON al.teenager_id = au.teenager_id AND al.app_name = au.app_name
                     WHERE au.usage_date {op} $1
                       AND ($2::uuid IS NULL OR au.teenager_id = $2)
                     ORDER BY au.usage_date DESC, au.app_name"
                ),
                &[&date, &teenager_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| ParentUsageRow {
                app_name: r.get(0),
                usage_date: r.get(1),
                usage_minutes: r.get(2),
                daily_limit_minutes: r.get(3),
                teenager_id: r.get(4),
                teenager_name: r.get(5),
            })
            .collect())
    }

    async fn parent_summary(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<ParentAppSummary>> {
        let client = self.pool.get().await?;
        let (op, date) = window_clause(window);

        let rows = client
            .query(
                &format!(
                    "SELECT au.app_name,
                            SUM(au.usage_minutes)::bigint,
                            AVG(au.usage_minutes)::float8,
                            COUNT(DISTINCT au.usage_date),
                            u.id, u.name
                     FROM app_usage au
                     JOIN users u ON u.id = au.teenager_id AND u.role = 'teenager'
                     WHERE au.usage_date {op} $1
                       AND ($2::uuid IS NULL OR au.teenager_id = $2)
                     GROUP BY au.app_name, u.id, u.name
                     ORDER BY SUM(au.usage_minutes) DESC"
                ),
                &[&date, &teenager_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| ParentAppSummary {
                app_name: r.get(0),
                total_minutes: r.get(1),
                avg_minutes: r.get(2),
                days_used: r.get(3),
                teenager_id: r.get(4),
                teenager_name: r.get(5),
            })
            .collect())
    }

    async fn total_screen_time(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<i64> {
        let client = self.pool.get().await?;
        let (op, date) = window_clause(window);

        let row = client
            .query_one(
                &format!(
                    "SELECT COALESCE(SUM(au.usage_minutes), 0)::bigint
                     FROM app_usage au
                     JOIN users u ON u.id = au.teenager_id AND u.role = 'teenager'
                     WHERE au.usage_date {op} $1
                       AND ($2::uuid IS NULL OR au.teenager_id = $2)"
                ),
                &[&date, &teenager_id],
            )
            .await?;

        Ok(row.get(0))
    }

    async fn task_stats_for_parent(
        &self,
        parent_id: UserId,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<TaskStats> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "SELECT COUNT(*),
                        COUNT(*) FILTER (WHERE status = 'completed'),
                        COUNT(*) FILTER (WHERE status = 'in_progress'),
                        COUNT(*) FILTER (WHERE status = 'pending')
                 FROM tasks
                 WHERE parent_id = $1 AND ($2::uuid IS NULL OR teenager_id = $2)",
                &[&parent_id, &teenager_id],
            )
            .await?;

        Ok(task_stats_from_row(&row))
    }

    async fn category_time(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<CategoryTime>> {
        let client = self.pool.get().await?;
        let (op, date) = window_clause(window);

        // Apps without a catalog entry fall into the 'Other' bucket.
        let rows = client
            .query(
                &format!(
                    "SELECT COALESCE(ca.category, 'Other'),
                            SUM(au.usage_minutes)::bigint,
                            COUNT(DISTINCT au.app_name)
                     FROM app_usage au
                     JOIN users u ON u.id = au.teenager_id AND u.role = 'teenager'
                     LEFT JOIN custom_apps ca
                       ON ca.app_name = au.app_name AND ca.teenager_id = au.teenager_id
                     WHERE au.usage_date {op} $1
                       AND ($2::uuid IS NULL OR au.teenager_id = $2)
                     GROUP BY COALESCE(ca.category, 'Other')
                     ORDER BY SUM(au.usage_minutes) DESC"
                ),
                &[&date, &teenager_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| CategoryTime {
                category: r.get(0),
                total_minutes: r.get(1),
                app_count: r.get(2),
            })
            .collect())
    }

    async fn blocked_sites_for_parent(
        &self,
        parent_id: UserId,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<BlockedSiteEntry>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT bs.id, bs.site_url, bs.created_at, bs.teenager_id, t.name
                 FROM blocked_sites bs
                 JOIN users t ON t.id = bs.teenager_id
                 WHERE bs.parent_id = $1 AND ($2::uuid IS NULL OR bs.teenager_id = $2)
                 ORDER BY bs.created_at DESC",
                &[&parent_id, &teenager_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| BlockedSiteEntry {
                id: r.get(0),
                site_url: r.get(1),
                created_at: r.get(2),
                teenager_id: r.get(3),
                teenager_name: r.get(4),
            })
            .collect())
    }
}
