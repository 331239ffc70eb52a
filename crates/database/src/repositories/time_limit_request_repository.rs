use crate::pool::DbPool;
use async_trait::async_trait;
use services::{
    limits::ports::{
        NewTimeLimitRequest, TimeLimitRequest, TimeLimitRequestListing,
        TimeLimitRequestRepository,
    },
    types::RequestStatus,
    TimeLimitRequestId, UserId,
};

pub struct PostgresTimeLimitRequestRepository {
    pool: DbPool,
}

impl PostgresTimeLimitRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const REQUEST_COLUMNS: &str = "r.id, r.teenager_id, r.parent_id, r.app_name, r.current_limit, \
     r.requested_limit, r.reason, r.status, r.created_at, r.updated_at";

fn request_from_row(row: &tokio_postgres::Row) -> anyhow::Result<TimeLimitRequest> {
    let status: String = row.get(7);
    let status = RequestStatus::parse(&status).ok_or_else(|| {
        anyhow::anyhow!("Unknown status in time_limit_requests table: {}", status)
    })?;
    Ok(TimeLimitRequest {
        id: row.get(0),
        teenager_id: row.get(1),
        parent_id: row.get(2),
        app_name: row.get(3),
        current_limit: row.get(4),
        requested_limit: row.get(5),
        reason: row.get(6),
        status,
        created_at: row.get(8),
        updated_at: row.get(9),
    })
}

#[async_trait]
impl TimeLimitRequestRepository for PostgresTimeLimitRequestRepository {
    async fn create_request(
        &self,
        request: NewTimeLimitRequest,
    ) -> anyhow::Result<TimeLimitRequest> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "INSERT INTO time_limit_requests
                   (teenager_id, parent_id, app_name, current_limit, requested_limit, reason)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING id, teenager_id, parent_id, app_name, current_limit,
                           requested_limit, reason, status, created_at, updated_at",
                &[
                    &request.teenager_id,
                    &request.parent_id,
                    &request.app_name,
                    &request.current_limit,
                    &request.requested_limit,
                    &request.reason,
                ],
            )
            .await?;

        request_from_row(&row)
    }

    async fn pending_exists(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<bool> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "SELECT EXISTS (
                     SELECT 1 FROM time_limit_requests
                     WHERE teenager_id = $1 AND app_name = $2 AND status = 'pending'
                 )",
                &[&teenager_id, &app_name],
            )
            .await?;

        Ok(row.get(0))
    }

    async fn list_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<TimeLimitRequest>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!(
                    "SELECT {REQUEST_COLUMNS} FROM time_limit_requests r
                     WHERE r.teenager_id = $1
                     ORDER BY r.created_at DESC"
                ),
                &[&teenager_id],
            )
            .await?;

        rows.iter().map(request_from_row).collect()
    }

    async fn list_for_parent(
        &self,
        parent_id: UserId,
        status: Option<RequestStatus>,
    ) -> anyhow::Result<Vec<TimeLimitRequestListing>> {
        let client = self.pool.get().await?;

        let status = status.map(|s| s.as_str());
        let rows = client
            .query(
                &format!(
                    "SELECT {REQUEST_COLUMNS}, teen.name
                     FROM time_limit_requests r
                     JOIN users teen ON teen.id = r.teenager_id
                     WHERE r.parent_id = $1 AND ($2::text IS NULL OR r.status = $2)
                     ORDER BY r.created_at DESC"
                ),
                &[&parent_id, &status],
            )
            .await?;

        rows.iter()
            .map(|r| {
                Ok(TimeLimitRequestListing {
                    request: request_from_row(r)?,
                    teenager_name: Some(r.get(10)),
                })
            })
            .collect()
    }

    async fn get_for_parent(
        &self,
        id: TimeLimitRequestId,
        parent_id: UserId,
    ) -> anyhow::Result<Option<TimeLimitRequest>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!(
                    "SELECT {REQUEST_COLUMNS} FROM time_limit_requests r
                     WHERE r.id = $1 AND r.parent_id = $2"
                ),
                &[&id, &parent_id],
            )
            .await?;

        row.as_ref().map(request_from_row).transpose()
    }

    async fn set_status(
        &self,
        id: TimeLimitRequestId,
        status: RequestStatus,
    ) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        client
            .execute(
                "UPDATE time_limit_requests SET status = $2, updated_at = NOW() WHERE id = $1",
                &[&id, &status.as_str()],
            )
            .await?;

        Ok(())
    }

    async fn delete_pending_for_teenager(
        &self,
        id: TimeLimitRequestId,
        teenager_id: UserId,
    ) -> anyhow::Result<u64> {
        let client = self.pool.get().await?;

        let removed = client
            .execute(
                "DELETE FROM time_limit_requests
                 WHERE id = $1 AND teenager_id = $2 AND status = 'pending'",
                &[&id, &teenager_id],
            )
            .await?;

        Ok(removed)
    }

    async fn delete_for_parent(
        &self,
        id: TimeLimitRequestId,
        parent_id: UserId,
    ) -> anyhow::Result<u64> {
        let client = self.pool.get().await?;

        let removed = client
            .execute(
                "DELETE FROM time_limit_requests WHERE id = $1 AND parent_id = $2",
                &[&id, &parent_id],
            )
            .await?;

        Ok(removed)
    }
}
