pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, DbPool};

use anyhow::Result;
use repositories::{
    PostgresAppLimitRepository, PostgresBlockedSiteRepository, PostgresCustomAppRepository,
    PostgresReportRepository, PostgresSessionRepository, PostgresTaskRepository,
    PostgresTimeLimitRequestRepository, PostgresTimeRequestRepository, PostgresUsageRepository,
    PostgresUserRepository,
};

/// Database service combining all repositories
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database service from a connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new database service from configuration
    pub fn from_config(config: &config::DatabaseConfig) -> Result<Self> {
        let pool = create_pool(config)?;
        Ok(Self::new(pool))
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run(&self.pool).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn users(&self) -> PostgresUserRepository {
        PostgresUserRepository::new(self.pool.clone())
    }

    pub fn sessions(&self) -> PostgresSessionRepository {
        PostgresSessionRepository::new(self.pool.clone())
    }

    pub fn usage(&self) -> PostgresUsageRepository {
        PostgresUsageRepository::new(self.pool.clone())
    }

    pub fn reports(&self) -> PostgresReportRepository {
        PostgresReportRepository::new(self.pool.clone())
    }

    pub fn tasks(&self) -> PostgresTaskRepository {
        PostgresTaskRepository::new(self.pool.clone())
    }

    pub fn time_requests(&self) -> PostgresTimeRequestRepository {
        PostgresTimeRequestRepository::new(self.pool.clone())
    }

    pub fn app_limits(&self) -> PostgresAppLimitRepository {
        PostgresAppLimitRepository::new(self.pool.clone())
    }

    pub fn time_limit_requests(&self) -> PostgresTimeLimitRequestRepository {
        PostgresTimeLimitRequestRepository::new(self.pool.clone())
    }

    pub fn blocked_sites(&self) -> PostgresBlockedSiteRepository {
        PostgresBlockedSiteRepository::new(self.pool.clone())
    }

    pub fn custom_apps(&self) -> PostgresCustomAppRepository {
        PostgresCustomAppRepository::new(self.pool.clone())
    }
}
