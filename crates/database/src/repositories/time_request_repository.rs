use crate::pool::DbPool;
use async_trait::async_trait;
use services::{
    time_requests::ports::{
        NewTimeRequest, TimeRequest, TimeRequestListing, TimeRequestRepository,
    },
    types::RequestStatus,
    TaskId, TimeRequestId, UserId,
};

pub struct PostgresTimeRequestRepository {
    pool: DbPool,
}

impl PostgresTimeRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const REQUEST_COLUMNS: &str = "r.id, r.task_id, r.teenager_id, r.additional_time, r.reason, \
     r.status, r.created_at, r.updated_at";

fn request_from_row(row: &tokio_postgres::Row) -> anyhow::Result<TimeRequest> {
    let status: String = row.get(5);
    let status = RequestStatus::parse(&status)
        .ok_or_else(|| anyhow::anyhow!("Unknown status in time_requests table: {}", status))?;
    Ok(TimeRequest {
        id: row.get(0),
        task_id: row.get(1),
        teenager_id: row.get(2),
        additional_time: row.get(3),
        reason: row.get(4),
        status,
        created_at: row.get(6),
        updated_at: row.get(7),
    })
}

#[async_trait]
impl TimeRequestRepository for PostgresTimeRequestRepository {
    async fn create_request(&self, request: NewTimeRequest) -> anyhow::Result<TimeRequest> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "INSERT INTO time_requests (task_id, teenager_id, additional_time, reason)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, task_id, teenager_id, additional_time, reason,
                           status, created_at, updated_at",
                &[
                    &request.task_id,
                    &request.teenager_id,
                    &request.additional_time,
                    &request.reason,
                ],
            )
            .await?;

        request_from_row(&row)
    }

    async fn get_request_with_task_owner(
        &self,
        id: TimeRequestId,
    ) -> anyhow::Result<Option<(TimeRequest, UserId)>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!(
                    "SELECT {REQUEST_COLUMNS}, t.parent_id
                     FROM time_requests r
                     JOIN tasks t ON t.id = r.task_id
                     WHERE r.id = $1"
                ),
                &[&id],
            )
            .await?;

        row.map(|r| Ok((request_from_row(&r)?, r.get(8))))
            .transpose()
    }

    async fn pending_exists_for_task(&self, task_id: TaskId) -> anyhow::Result<bool> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "SELECT EXISTS (
                     SELECT 1 FROM time_requests
                     WHERE task_id = $1 AND status = 'pending'
                 )",
                &[&task_id],
            )
            .await?;

        Ok(row.get(0))
    }

    async fn list_for_parent(
        &self,
        parent_id: UserId,
    ) -> anyhow::Result<Vec<TimeRequestListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!(
                    "SELECT {REQUEST_COLUMNS}, t.title, teen.name
                     FROM time_requests r
                     JOIN tasks t ON t.id = r.task_id
                     JOIN users teen ON teen.id = r.teenager_id
                     WHERE t.parent_id = $1
                     ORDER BY r.created_at DESC"
                ),
                &[&parent_id],
            )
            .await?;

        rows.iter()
            .map(|r| {
                Ok(TimeRequestListing {
                    request: request_from_row(r)?,
                    task_title: r.get(8),
                    teenager_name: Some(r.get(9)),
                })
            })
            .collect()
    }

    async fn list_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<TimeRequestListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!(
                    "SELECT {REQUEST_COLUMNS}, t.title
                     FROM time_requests r
                     JOIN tasks t ON t.id = r.task_id
                     WHERE r.teenager_id = $1
                     ORDER BY r.created_at DESC"
                ),
                &[&teenager_id],
            )
            .await?;

        rows.iter()
            .map(|r| {
                Ok(TimeRequestListing {
                    request: request_from_row(r)?,
                    task_title: r.get(8),
                    teenager_name: None,
                })
            })
            .collect()
    }

    async fn set_status(&self, id: TimeRequestId, status: RequestStatus) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        client
            .execute(
                "UPDATE time_requests SET status = $2, updated_at = NOW() WHERE id = $1",
                &[&id, &status.as_str()],
            )
            .await?;

        Ok(())
    }
}
