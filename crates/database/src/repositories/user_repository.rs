use crate::pool::DbPool;
use async_trait::async_trait;
use services::{
    auth::ports::{AccountListing, NewUser, Role, User, UserRepository},
    UserId,
};

pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, parent_id, created_at, updated_at";

fn user_from_row(row: &tokio_postgres::Row) -> anyhow::Result<User> {
    let role: String = row.get(4);
    let role = Role::parse(&role)
        .ok_or_else(|| anyhow::anyhow!("Unknown role in users table: {}", role))?;
    Ok(User {
        id: row.get(0),
        name: row.get(1),
        email: row.get(2),
        password_hash: row.get(3),
        role,
        parent_id: row.get(5),
        created_at: row.get(6),
        updated_at: row.get(7),
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                &format!(
                    "INSERT INTO users (name, email, password_hash, role, parent_id)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING {USER_COLUMNS}"
                ),
                &[
                    &user.name,
                    &user.email,
                    &user.password_hash,
                    &user.role.as_str(),
                    &user.parent_id,
                ],
            )
            .await?;

        user_from_row(&row)
    }

    async fn get_user(&self, user_id: UserId) -> anyhow::Result<Option<User>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"),
                &[&user_id],
            )
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"),
                &[&email],
            )
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_parents(&self) -> anyhow::Result<Vec<AccountListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT id, name, email FROM users WHERE role = 'parent' ORDER BY name",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| AccountListing {
                id: r.get(0),
                name: r.get(1),
                email: r.get(2),
            })
            .collect())
    }

    async fn list_teenagers(&self) -> anyhow::Result<Vec<AccountListing>> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT id, name, email FROM users WHERE role = 'teenager' ORDER BY name",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|r| AccountListing {
                id: r.get(0),
                name: r.get(1),
                email: r.get(2),
            })
            .collect())
    }

    async fn get_user_with_role(
        &self,
        user_id: UserId,
        role: Role,
    ) -> anyhow::Result<Option<User>> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = $2"),
                &[&user_id, &role.as_str()],
            )
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }
}
