use crate::pool::DbPool;
use async_trait::async_trait;
use services::{
    tasks::ports::{NewTask, Task, TaskListing, TaskRepository, TaskStatus},
    TaskId, UserId,
};

pub struct PostgresTaskRepository {
    pool: DbPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = "id, parent_id, teenager_id, title, description, \
     due_date, estimated_time, status, created_at, updated_at";

const TASK_COLUMNS_ALIASED: &str = "t.id, t.parent_id, t.teenager_id, t.title, t.description, \
     t.due_date, t.estimated_time, t.status, t.created_at, t.updated_at";

fn task_from_row(row: &tokio_postgres::Row) -> anyhow::Result<Task> {
    let status: String = row.get(7);
    let status = TaskStatus::parse(&status)
        .ok_or_else(|| anyhow::anyhow!("Unknown status in tasks table: {}", status))?;
    Ok(Task {
        id: row.get(0),
        parent_id: row.get(1),
        teenager_id: row.get(2),
        title: row.get(3),
        description: row.get(4),
        due_date: row.get(5),
        estimated_time: row.get(6),
        status,
        created_at: row.get(8),
        updated_at: row.get(9),
    })
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create_task(&self, task: NewTask) -> anyhow::Result<Task> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                &format!(
                    "INSERT INTO tasks
                       (parent_id, teenager_id, title, description, due_date, estimated_time)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING {TASK_COLUMNS}"
                ),
                &[
                    &task.parent_id,
                    &task.teenager_id,
                    &task.title,
                    &task.description,
                    &task.due_date,
                    &task.estimated_time,
                ],
            )
            .await?;

        task_from_row(&row)
    }

    async fn get_task(&self, task_id: TaskId) -> anyhow::Result<Option<Task>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"),
                &[&task_id],
            )
            .await?;

        row.as_ref().map(task_from_row).transpose()
    }

    async fn list_all(&self) -> anyhow::Result<Vec<TaskListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!(
                    "SELECT {TASK_COLUMNS_ALIASED}, teen.name, teen.email
                     FROM tasks t
                     JOIN users teen ON teen.id = t.teenager_id
                     ORDER BY t.created_at DESC"
                ),
                &[],
            )
            .await?;

        rows.iter()
            .map(|r| {
                Ok(TaskListing {
                    task: task_from_row(r)?,
                    teenager_name: Some(r.get(10)),
                    teenager_email: Some(r.get(11)),
                    parent_name: None,
                })
            })
            .collect()
    }

    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<TaskListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!(
                    "SELECT {TASK_COLUMNS_ALIASED}, p.name
                     FROM tasks t
                     JOIN users p ON p.id = t.parent_id
                     WHERE t.teenager_id = $1
                     ORDER BY t.created_at DESC"
                ),
                &[&teenager_id],
            )
            .await?;

        rows.iter()
            .map(|r| {
                Ok(TaskListing {
                    task: task_from_row(r)?,
                    teenager_name: None,
                    teenager_email: None,
                    parent_name: Some(r.get(10)),
                })
            })
            .collect()
    }

    async fn set_status(&self, task_id: TaskId, status: TaskStatus) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        client
            .execute(
                "UPDATE tasks SET status = $2, updated_at = NOW() WHERE id = $1",
                &[&task_id, &status.as_str()],
            )
            .await?;

        Ok(())
    }

    async fn extend_due_date(&self, task_id: TaskId, minutes: i32) -> anyhow::Result<()> {
        let client = self.pool.get().await?;

        client
            .execute(
                "UPDATE tasks
                 SET due_date = due_date + make_interval(mins => $2),
                     updated_at = NOW()
                 WHERE id = $1",
                &[&task_id, &minutes],
            )
            .await?;

        Ok(())
    }
}
