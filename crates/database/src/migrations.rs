use crate::pool::DbPool;
use anyhow::Result;
use tracing::info;

/// Migrations embedded at compile time, applied in order. Each entry runs
/// once; the version column tracks what has been applied.
const MIGRATIONS: &[(&str, &str)] = &[(
    "0001_initial",
    include_str!("../migrations/0001_initial.sql"),
)];

pub async fn run(pool: &DbPool) -> Result<()> {
    let client = pool.get().await?;

    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version TEXT PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .await?;

    for (version, sql) in MIGRATIONS {
        let applied = client
            .query_opt(
                "SELECT version FROM schema_migrations WHERE version = $1",
                &[version],
            )
            .await?
            .is_some();
        if applied {
            continue;
        }

        info!("Applying migration {}", version);
        client.batch_execute(sql).await?;
        client
            .execute(
                "INSERT INTO schema_migrations (version) VALUES ($1)",
                &[version],
            )
            .await?;
    }

    Ok(())
}
