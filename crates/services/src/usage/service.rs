use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use super::ports::{DateWindow, UsageRepository, UsageRow, UsageService};
use crate::auth::ports::{Caller, Role};
use crate::error::{ServiceError, ServiceResult};

/// Shortest app name accepted after trimming. Single-character names are
/// always tracker noise (stray keystrokes, truncated payloads).
pub const MIN_APP_NAME_LEN: usize = 2;

pub struct UsageServiceImpl {
    usage_repository: Arc<dyn UsageRepository>,
}

impl UsageServiceImpl {
    pub fn new(usage_repository: Arc<dyn UsageRepository>) -> Self {
        Self { usage_repository }
    }
}

#[async_trait]
impl UsageService for UsageServiceImpl {
    async fn record_usage(
        &self,
        caller: Caller,
        app_name: &str,
        minutes: i32,
        today: NaiveDate,
    ) -> ServiceResult<i32> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization(
                "Only teenagers can track usage",
            ));
        }

        let app_name = app_name.trim();
        if app_name.len() < MIN_APP_NAME_LEN {
            tracing::warn!("Rejected usage for invalid app name: \"{}\"", app_name);
            return Err(ServiceError::validation(
                "App name must be at least 2 characters long",
            ));
        }
        // Zero is a valid no-op session; it still refreshes updated_at.
        if minutes < 0 {
            return Err(ServiceError::validation(
                "Usage minutes must be non-negative",
            ));
        }

        tracing::info!(
            "Teen {} saving usage for \"{}\": {} minutes on {}",
            caller.user_id,
            app_name,
            minutes,
            today
        );

        self.usage_repository
            .add_usage(caller.user_id, app_name, minutes, today)
            .await?;

        // Read back the row so the caller observes the accumulated total,
        // not its own delta, even under concurrent writers.
        let saved = self
            .usage_repository
            .total_for_day(caller.user_id, app_name, today)
            .await?
            .unwrap_or(minutes);

        tracing::debug!(
            "Verified \"{}\" now has {} minutes stored for {}",
            app_name,
            saved,
            today
        );

        Ok(saved)
    }

    async fn list_usage(
        &self,
        caller: Caller,
        days: i64,
        today: NaiveDate,
    ) -> ServiceResult<Vec<UsageRow>> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization(
                "Only teenagers can view their usage",
            ));
        }
        if days < 0 {
            return Err(ServiceError::validation(
                "Days must be zero or a positive number",
            ));
        }

        let window = DateWindow::resolve(days, today);
        Ok(self
            .usage_repository
            .usage_in_window(caller.user_id, window)
            .await?)
    }
}
