use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use super::ports::{ParentReport, ReportRepository, ReportService, TeenReport};
use crate::auth::ports::{Caller, Role};
use crate::error::{ServiceError, ServiceResult};
use crate::types::UserId;
use crate::usage::ports::DateWindow;

pub struct ReportServiceImpl {
    report_repository: Arc<dyn ReportRepository>,
}

impl ReportServiceImpl {
    pub fn new(report_repository: Arc<dyn ReportRepository>) -> Self {
        Self { report_repository }
    }

    fn window_for(days: i64, today: NaiveDate) -> ServiceResult<DateWindow> {
        if days < 0 {
            return Err(ServiceError::validation(
                "Days must be zero or a positive number",
            ));
        }
        Ok(DateWindow::resolve(days, today))
    }
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    async fn teen_report(
        &self,
        caller: Caller,
        days: i64,
        today: NaiveDate,
    ) -> ServiceResult<TeenReport> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization(
                "Only teenagers can view their report",
            ));
        }
        let window = Self::window_for(days, today)?;
        let teen = caller.user_id;

        tracing::info!("Teen {} requesting report over {} day(s)", teen, days);

        let daily_usage = self.report_repository.daily_usage(teen, window).await?;
        let summary = self.report_repository.app_summary(teen, window).await?;
        // Today's slice always uses the threaded report date, independent of
        // the window, so the limit-enforcement UI sees live totals.
        let today_usage = self.report_repository.today_usage(teen, today).await?;
        let tasks_stats = self.report_repository.task_stats_for_teenager(teen).await?;
        let blocked_sites = self
            .report_repository
            .blocked_sites_for_teenager(teen)
            .await?;

        Ok(TeenReport {
            daily_usage,
            summary,
            today_usage,
            tasks_stats,
            blocked_sites,
        })
    }

    async fn parent_report(
        &self,
        caller: Caller,
        days: i64,
        teenager_id: Option<UserId>,
        today: NaiveDate,
    ) -> ServiceResult<ParentReport> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization("Only parents can view reports"));
        }
        let window = Self::window_for(days, today)?;

        tracing::info!(
            "Parent {} requesting report over {} day(s), teenager filter: {:?}",
            caller.user_id,
            days,
            teenager_id
        );

        // The same teenager filter goes to every sub-query; the sections of
        // a report must agree on scope.
        let usage = self
            .report_repository
            .parent_usage(window, teenager_id)
            .await?;
        let summary = self
            .report_repository
            .parent_summary(window, teenager_id)
            .await?;
        let total_screen_time = self
            .report_repository
            .total_screen_time(window, teenager_id)
            .await?;
        let tasks_stats = self
            .report_repository
            .task_stats_for_parent(caller.user_id, teenager_id)
            .await?;
        let category_time = self
            .report_repository
            .category_time(window, teenager_id)
            .await?;
        let blocked_sites = self
            .report_repository
            .blocked_sites_for_parent(caller.user_id, teenager_id)
            .await?;

        Ok(ParentReport {
            usage,
            summary,
            total_screen_time,
            tasks_stats,
            category_time,
            blocked_sites,
        })
    }
}
