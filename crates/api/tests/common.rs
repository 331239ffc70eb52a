#![allow(dead_code)]

use api::{create_router_with_cors, AppState};
use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use services::apps::ports::{
    CustomApp, CustomAppListing, CustomAppRepository, CustomAppUpdate, NewCustomApp,
};
use services::apps::CustomAppServiceImpl;
use services::auth::ports::{
    AccountListing, NewUser, Role, SessionRepository, User, UserRepository, UserSession,
};
use services::auth::AuthServiceImpl;
use services::limits::ports::{
    AppLimit, AppLimitListing, AppLimitRepository, LimitWrite, NewTimeLimitRequest,
    TimeLimitRequest, TimeLimitRequestListing, TimeLimitRequestRepository,
};
use services::limits::LimitServiceImpl;
use services::report::ports::{
    AppSummary, BlockedSiteEntry, CategoryTime, ParentAppSummary, ParentUsageRow,
    ReportRepository, TaskStats, TodayUsage,
};
use services::report::ReportServiceImpl;
use services::sites::ports::{BlockedSite, BlockedSiteListing, BlockedSiteRepository};
use services::sites::BlockedSiteServiceImpl;
use services::tasks::ports::{NewTask, Task, TaskListing, TaskRepository, TaskStatus};
use services::tasks::TaskServiceImpl;
use services::time_requests::ports::{
    NewTimeRequest, TimeRequest, TimeRequestListing, TimeRequestRepository,
};
use services::time_requests::TimeRequestServiceImpl;
use services::types::RequestStatus;
use services::usage::ports::{DateWindow, UsageRepository, UsageRow};
use services::usage::UsageServiceImpl;
use services::{
    AppLimitId, BlockedSiteId, CustomAppId, SessionId, TaskId, TimeLimitRequestId, TimeRequestId,
    UserId,
};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Everything the API persists, held in one mutex so tests never touch a
/// real database.
#[derive(Default)]
pub struct FamilyStore {
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    users: Vec<User>,
    sessions: Vec<StoredSession>,
    usage: Vec<UsageCell>,
    tasks: Vec<Task>,
    time_requests: Vec<TimeRequest>,
    limits: Vec<AppLimit>,
    limit_requests: Vec<TimeLimitRequest>,
    sites: Vec<BlockedSite>,
    custom_apps: Vec<CustomApp>,
    hidden: HashSet<(UserId, String)>,
}

#[derive(Clone)]
struct StoredSession {
    session: UserSession,
    token_hash: String,
}

#[derive(Clone)]
struct UsageCell {
    teenager_id: UserId,
    app_name: String,
    usage_date: NaiveDate,
    usage_minutes: i32,
    updated_at: chrono::DateTime<Utc>,
}

fn sha256_hex(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn in_window(date: NaiveDate, window: DateWindow) -> bool {
    match window {
        DateWindow::On(day) => date == day,
        DateWindow::Since(start) => date >= start,
    }
}

impl FamilyStore {
    fn user_name(inner: &StoreInner, user_id: UserId) -> Option<String> {
        inner
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.clone())
    }

    fn current_limit(inner: &StoreInner, teenager_id: UserId, app_name: &str) -> Option<i32> {
        inner
            .limits
            .iter()
            .find(|l| l.teenager_id == teenager_id && l.app_name == app_name)
            .map(|l| l.daily_limit_minutes)
    }
}

pub struct InMemoryUserRepo(pub Arc<FamilyStore>);

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User> {
        let now = Utc::now();
        let created = User {
            id: UserId::new(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            parent_id: user.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.0.inner.lock().unwrap().users.push(created.clone());
        Ok(created)
    }

    async fn get_user(&self, user_id: UserId) -> anyhow::Result<Option<User>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_parents(&self) -> anyhow::Result<Vec<AccountListing>> {
        let inner = self.0.inner.lock().unwrap();
        let mut parents: Vec<AccountListing> = inner
            .users
            .iter()
            .filter(|u| u.role == Role::Parent)
            .map(|u| AccountListing {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
            })
            .collect();
        parents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parents)
    }

    async fn list_teenagers(&self) -> anyhow::Result<Vec<AccountListing>> {
        let inner = self.0.inner.lock().unwrap();
        let mut teens: Vec<AccountListing> = inner
            .users
            .iter()
            .filter(|u| u.role == Role::Teenager)
            .map(|u| AccountListing {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
            })
            .collect();
        teens.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teens)
    }

    async fn get_user_with_role(
        &self,
        user_id: UserId,
        role: Role,
    ) -> anyhow::Result<Option<User>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .find(|u| u.id == user_id && u.role == role)
            .cloned())
    }
}

pub struct InMemorySessionRepo(pub Arc<FamilyStore>);

#[async_trait]
impl SessionRepository for InMemorySessionRepo {
    async fn create_session(&self, user_id: UserId, ttl_days: i64) -> anyhow::Result<UserSession> {
        let token = format!("sess_{}", Uuid::new_v4().simple());
        let now = Utc::now();
        let session = UserSession {
            session_id: SessionId::new(),
            user_id,
            created_at: now,
            expires_at: now + Duration::days(ttl_days),
            token: Some(token.clone()),
        };
        self.0.inner.lock().unwrap().sessions.push(StoredSession {
            session: session.clone(),
            token_hash: sha256_hex(&token),
        });
        Ok(session)
    }

    async fn get_session_by_token_hash(
        &self,
        token_hash: String,
    ) -> anyhow::Result<Option<UserSession>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash)
            .map(|s| UserSession {
                token: None,
                ..s.session.clone()
            }))
    }

    async fn delete_session(&self, session_id: SessionId) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        inner.sessions.retain(|s| s.session.session_id != session_id);
        Ok(())
    }
}

pub struct InMemoryUsageRepo(pub Arc<FamilyStore>);

#[async_trait]
impl UsageRepository for InMemoryUsageRepo {
    async fn add_usage(
        &self,
        teenager_id: UserId,
        app_name: &str,
        minutes: i32,
        date: NaiveDate,
    ) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        if let Some(cell) = inner.usage.iter_mut().find(|c| {
            c.teenager_id == teenager_id && c.app_name == app_name && c.usage_date == date
        }) {
            cell.usage_minutes += minutes;
            cell.updated_at = Utc::now();
        } else {
            inner.usage.push(UsageCell {
                teenager_id,
                app_name: app_name.to_string(),
                usage_date: date,
                usage_minutes: minutes,
                updated_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn total_for_day(
        &self,
        teenager_id: UserId,
        app_name: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Option<i32>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .usage
            .iter()
            .find(|c| {
                c.teenager_id == teenager_id && c.app_name == app_name && c.usage_date == date
            })
            .map(|c| c.usage_minutes))
    }

    async fn usage_in_window(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<UsageRow>> {
        let inner = self.0.inner.lock().unwrap();
        let mut rows: Vec<UsageRow> = inner
            .usage
            .iter()
            .filter(|c| c.teenager_id == teenager_id && in_window(c.usage_date, window))
            .map(|c| UsageRow {
                app_name: c.app_name.clone(),
                usage_date: c.usage_date,
                usage_minutes: c.usage_minutes,
            })
            .collect();
        match window {
            DateWindow::On(_) => rows.sort_by(|a, b| a.app_name.cmp(&b.app_name)),
            DateWindow::Since(_) => rows.sort_by(|a, b| {
                b.usage_date
                    .cmp(&a.usage_date)
                    .then_with(|| a.app_name.cmp(&b.app_name))
            }),
        }
        Ok(rows)
    }
}

pub struct InMemoryReportRepo(pub Arc<FamilyStore>);

impl InMemoryReportRepo {
    fn task_stats(tasks: &[Task], filter: impl Fn(&Task) -> bool) -> TaskStats {
        let mut stats = TaskStats::default();
        for task in tasks.iter().filter(|t| filter(t)) {
            stats.total_tasks += 1;
            match task.status {
                TaskStatus::Completed => stats.completed_tasks += 1,
                TaskStatus::InProgress => stats.in_progress_tasks += 1,
                TaskStatus::Pending => stats.pending_tasks += 1,
            }
        }
        stats
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepo {
    async fn daily_usage(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<UsageRow>> {
        InMemoryUsageRepo(self.0.clone())
            .usage_in_window(teenager_id, window)
            .await
    }

    async fn app_summary(
        &self,
        teenager_id: UserId,
        window: DateWindow,
    ) -> anyhow::Result<Vec<AppSummary>> {
        let inner = self.0.inner.lock().unwrap();
        let mut summaries: Vec<AppSummary> = Vec::new();
        for cell in inner
            .usage
            .iter()
            .filter(|c| c.teenager_id == teenager_id && in_window(c.usage_date, window))
        {
            if let Some(existing) = summaries.iter_mut().find(|s| s.app_name == cell.app_name) {
                existing.total_minutes += cell.usage_minutes as i64;
                existing.days_used += 1;
            } else {
                summaries.push(AppSummary {
                    app_name: cell.app_name.clone(),
                    total_minutes: cell.usage_minutes as i64,
                    avg_minutes: 0.0,
                    days_used: 1,
                    daily_limit_minutes: FamilyStore::current_limit(
                        &inner,
                        teenager_id,
                        &cell.app_name,
                    ),
                });
            }
        }
        for summary in &mut summaries {
            summary.avg_minutes = summary.total_minutes as f64 / summary.days_used as f64;
        }
        summaries.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
        Ok(summaries)
    }

    async fn today_usage(
        &self,
        teenager_id: UserId,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<TodayUsage>> {
        let inner = self.0.inner.lock().unwrap();
        let mut rows: Vec<TodayUsage> = inner
            .usage
            .iter()
            .filter(|c| c.teenager_id == teenager_id && c.usage_date == date)
            .map(|c| TodayUsage {
                app_name: c.app_name.clone(),
                usage_minutes: c.usage_minutes,
                usage_date: c.usage_date,
                daily_limit_minutes: FamilyStore::current_limit(&inner, teenager_id, &c.app_name),
                updated_at: c.updated_at,
            })
            .collect();
        rows.sort_by(|a, b| a.app_name.cmp(&b.app_name));
        Ok(rows)
    }

    async fn task_stats_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<TaskStats> {
        let inner = self.0.inner.lock().unwrap();
        Ok(Self::task_stats(&inner.tasks, |t| {
            t.teenager_id == teenager_id
        }))
    }

    async fn blocked_sites_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<BlockedSiteEntry>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .sites
            .iter()
            .filter(|s| s.teenager_id == teenager_id)
            .map(|s| BlockedSiteEntry {
                id: s.id,
                site_url: s.site_url.clone(),
                created_at: s.created_at,
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
        let inner = self.0.inner.lock().unwrap();
        let mut rows: Vec<ParentUsageRow> = inner
            .usage
            .iter()
            .filter(|c| {
                in_window(c.usage_date, window)
                    && teenager_id.map_or(true, |t| c.teenager_id == t)
            })
            .map(|c| ParentUsageRow {
                app_name: c.app_name.clone(),
                usage_date: c.usage_date,
                usage_minutes: c.usage_minutes,
                daily_limit_minutes: FamilyStore::current_limit(&inner, c.teenager_id, &c.app_name),
                teenager_id: c.teenager_id,
                teenager_name: FamilyStore::user_name(&inner, c.teenager_id).unwrap_or_default(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.usage_date
                .cmp(&a.usage_date)
                .then_with(|| a.app_name.cmp(&b.app_name))
        });
        Ok(rows)
    }

    async fn parent_summary(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<ParentAppSummary>> {
        let inner = self.0.inner.lock().unwrap();
        let mut summaries: Vec<ParentAppSummary> = Vec::new();
        for cell in inner.usage.iter().filter(|c| {
            in_window(c.usage_date, window) && teenager_id.map_or(true, |t| c.teenager_id == t)
        }) {
            if let Some(existing) = summaries
                .iter_mut()
                .find(|s| s.app_name == cell.app_name && s.teenager_id == cell.teenager_id)
            {
                existing.total_minutes += cell.usage_minutes as i64;
                existing.days_used += 1;
            } else {
                summaries.push(ParentAppSummary {
                    app_name: cell.app_name.clone(),
                    total_minutes: cell.usage_minutes as i64,
                    avg_minutes: 0.0,
                    days_used: 1,
                    teenager_id: cell.teenager_id,
                    teenager_name: FamilyStore::user_name(&inner, cell.teenager_id)
                        .unwrap_or_default(),
                });
            }
        }
        for summary in &mut summaries {
            summary.avg_minutes = summary.total_minutes as f64 / summary.days_used as f64;
        }
        summaries.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
        Ok(summaries)
    }

    async fn total_screen_time(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<i64> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .usage
            .iter()
            .filter(|c| {
                in_window(c.usage_date, window)
                    && teenager_id.map_or(true, |t| c.teenager_id == t)
            })
            .map(|c| c.usage_minutes as i64)
            .sum())
    }

    async fn task_stats_for_parent(
        &self,
        parent_id: UserId,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<TaskStats> {
        let inner = self.0.inner.lock().unwrap();
        Ok(Self::task_stats(&inner.tasks, |t| {
            t.parent_id == parent_id && teenager_id.map_or(true, |teen| t.teenager_id == teen)
        }))
    }

    async fn category_time(
        &self,
        window: DateWindow,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<CategoryTime>> {
        let inner = self.0.inner.lock().unwrap();
        let mut buckets: Vec<(String, i64, HashSet<String>)> = Vec::new();
        for cell in inner.usage.iter().filter(|c| {
            in_window(c.usage_date, window) && teenager_id.map_or(true, |t| c.teenager_id == t)
        }) {
            let category = inner
                .custom_apps
                .iter()
                .find(|a| a.teenager_id == cell.teenager_id && a.app_name == cell.app_name)
                .map(|a| a.category.clone())
                .unwrap_or_else(|| "Other".to_string());
            if let Some(bucket) = buckets.iter_mut().find(|(c, _, _)| *c == category) {
                bucket.1 += cell.usage_minutes as i64;
                bucket.2.insert(cell.app_name.clone());
            } else {
                let mut apps = HashSet::new();
                apps.insert(cell.app_name.clone());
                buckets.push((category, cell.usage_minutes as i64, apps));
            }
        }
        buckets.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(buckets
            .into_iter()
            .map(|(category, total_minutes, apps)| CategoryTime {
                category,
                total_minutes,
                app_count: apps.len() as i64,
            })
            .collect())
    }

    async fn blocked_sites_for_parent(
        &self,
        parent_id: UserId,
        teenager_id: Option<UserId>,
    ) -> anyhow::Result<Vec<BlockedSiteEntry>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .sites
            .iter()
            .filter(|s| {
                s.parent_id == parent_id && teenager_id.map_or(true, |t| s.teenager_id == t)
            })
            .map(|s| BlockedSiteEntry {
                id: s.id,
                site_url: s.site_url.clone(),
                created_at: s.created_at,
                teenager_id: Some(s.teenager_id),
                teenager_name: FamilyStore::user_name(&inner, s.teenager_id),
            })
            .collect())
    }
}

pub struct InMemoryTaskRepo(pub Arc<FamilyStore>);

#[async_trait]
impl TaskRepository for InMemoryTaskRepo {
    async fn create_task(&self, task: NewTask) -> anyhow::Result<Task> {
        let now = Utc::now();
        let created = Task {
            id: TaskId::new(),
            parent_id: task.parent_id,
            teenager_id: task.teenager_id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            estimated_time: task.estimated_time,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.0.inner.lock().unwrap().tasks.push(created.clone());
        Ok(created)
    }

    async fn get_task(&self, task_id: TaskId) -> anyhow::Result<Option<Task>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.tasks.iter().find(|t| t.id == task_id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<TaskListing>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .tasks
            .iter()
            .map(|t| TaskListing {
                task: t.clone(),
                teenager_name: FamilyStore::user_name(&inner, t.teenager_id),
                teenager_email: inner
                    .users
                    .iter()
                    .find(|u| u.id == t.teenager_id)
                    .map(|u| u.email.clone()),
                parent_name: None,
            })
            .collect())
    }

    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<TaskListing>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.teenager_id == teenager_id)
            .map(|t| TaskListing {
                task: t.clone(),
                teenager_name: None,
                teenager_email: None,
                parent_name: FamilyStore::user_name(&inner, t.parent_id),
            })
            .collect())
    }

    async fn set_status(&self, task_id: TaskId, status: TaskStatus) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        if let Some(task) = inner.tasks.iter_mut().find(|t| t.id == task_id) {
            task.status = status;
            task.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn extend_due_date(&self, task_id: TaskId, minutes: i32) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        if let Some(task) = inner.tasks.iter_mut().find(|t| t.id == task_id) {
            task.due_date += Duration::minutes(minutes as i64);
            task.updated_at = Utc::now();
        }
        Ok(())
    }
}

pub struct InMemoryTimeRequestRepo(pub Arc<FamilyStore>);

#[async_trait]
impl TimeRequestRepository for InMemoryTimeRequestRepo {
    async fn create_request(&self, request: NewTimeRequest) -> anyhow::Result<TimeRequest> {
        let now = Utc::now();
        let created = TimeRequest {
            id: TimeRequestId::new(),
            task_id: request.task_id,
            teenager_id: request.teenager_id,
            additional_time: request.additional_time,
            reason: request.reason,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.0
            .inner
            .lock()
            .unwrap()
            .time_requests
            .push(created.clone());
        Ok(created)
    }

    async fn get_request_with_task_owner(
        &self,
        id: TimeRequestId,
    ) -> anyhow::Result<Option<(TimeRequest, UserId)>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.time_requests.iter().find(|r| r.id == id).and_then(|r| {
            inner
                .tasks
                .iter()
                .find(|t| t.id == r.task_id)
                .map(|t| (r.clone(), t.parent_id))
        }))
    }

    async fn pending_exists_for_task(&self, task_id: TaskId) -> anyhow::Result<bool> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .time_requests
            .iter()
            .any(|r| r.task_id == task_id && r.status == RequestStatus::Pending))
    }

    async fn list_for_parent(
        &self,
        parent_id: UserId,
    ) -> anyhow::Result<Vec<TimeRequestListing>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .time_requests
            .iter()
            .filter_map(|r| {
                let task = inner
                    .tasks
                    .iter()
                    .find(|t| t.id == r.task_id && t.parent_id == parent_id)?;
                Some(TimeRequestListing {
                    request: r.clone(),
                    task_title: task.title.clone(),
                    teenager_name: FamilyStore::user_name(&inner, r.teenager_id),
                })
            })
            .collect())
    }

    async fn list_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<TimeRequestListing>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .time_requests
            .iter()
            .filter(|r| r.teenager_id == teenager_id)
            .map(|r| TimeRequestListing {
                request: r.clone(),
                task_title: inner
                    .tasks
                    .iter()
                    .find(|t| t.id == r.task_id)
                    .map(|t| t.title.clone())
                    .unwrap_or_default(),
                teenager_name: None,
            })
            .collect())
    }

    async fn set_status(&self, id: TimeRequestId, status: RequestStatus) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        if let Some(request) = inner.time_requests.iter_mut().find(|r| r.id == id) {
            request.status = status;
            request.updated_at = Utc::now();
        }
        Ok(())
    }
}

pub struct InMemoryAppLimitRepo(pub Arc<FamilyStore>);

#[async_trait]
impl AppLimitRepository for InMemoryAppLimitRepo {
    async fn list_for_parent(&self, parent_id: UserId) -> anyhow::Result<Vec<AppLimitListing>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .limits
            .iter()
            .filter(|l| l.parent_id == parent_id)
            .map(|l| AppLimitListing {
                limit: l.clone(),
                teenager_name: FamilyStore::user_name(&inner, l.teenager_id),
            })
            .collect())
    }

    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<AppLimit>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .limits
            .iter()
            .filter(|l| l.teenager_id == teenager_id)
            .cloned()
            .collect())
    }

    async fn get_limit(
        &self,
        teenager_id: UserId,
        app_name: &str,
    ) -> anyhow::Result<Option<AppLimit>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .limits
            .iter()
            .find(|l| l.teenager_id == teenager_id && l.app_name == app_name)
            .cloned())
    }

    async fn upsert_limit(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        app_name: &str,
        daily_limit_minutes: i32,
    ) -> anyhow::Result<LimitWrite> {
        let mut inner = self.0.inner.lock().unwrap();
        if let Some(limit) = inner
            .limits
            .iter_mut()
            .find(|l| l.teenager_id == teenager_id && l.app_name == app_name)
        {
            limit.daily_limit_minutes = daily_limit_minutes;
            Ok(LimitWrite::Updated)
        } else {
            inner.limits.push(AppLimit {
                id: AppLimitId::new(),
                parent_id,
                teenager_id,
                app_name: app_name.to_string(),
                daily_limit_minutes,
                created_at: Utc::now(),
            });
            Ok(LimitWrite::Created)
        }
    }

    async fn get_for_parent(
        &self,
        id: AppLimitId,
        parent_id: UserId,
    ) -> anyhow::Result<Option<AppLimit>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .limits
            .iter()
            .find(|l| l.id == id && l.parent_id == parent_id)
            .cloned())
    }

    async fn delete_limit(&self, id: AppLimitId) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        inner.limits.retain(|l| l.id != id);
        Ok(())
    }
}

pub struct InMemoryTimeLimitRequestRepo(pub Arc<FamilyStore>);

#[async_trait]
impl TimeLimitRequestRepository for InMemoryTimeLimitRequestRepo {
    async fn create_request(
        &self,
        request: NewTimeLimitRequest,
    ) -> anyhow::Result<TimeLimitRequest> {
        let now = Utc::now();
        let created = TimeLimitRequest {
            id: TimeLimitRequestId::new(),
            teenager_id: request.teenager_id,
            parent_id: request.parent_id,
            app_name: request.app_name,
            current_limit: request.current_limit,
            requested_limit: request.requested_limit,
            reason: request.reason,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.0
            .inner
            .lock()
            .unwrap()
            .limit_requests
            .push(created.clone());
        Ok(created)
    }

    async fn pending_exists(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<bool> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.limit_requests.iter().any(|r| {
            r.teenager_id == teenager_id
                && r.app_name == app_name
                && r.status == RequestStatus::Pending
        }))
    }

    async fn list_for_teenager(
        &self,
        teenager_id: UserId,
    ) -> anyhow::Result<Vec<TimeLimitRequest>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .limit_requests
            .iter()
            .filter(|r| r.teenager_id == teenager_id)
            .cloned()
            .collect())
    }

    async fn list_for_parent(
        &self,
        parent_id: UserId,
        status: Option<RequestStatus>,
    ) -> anyhow::Result<Vec<TimeLimitRequestListing>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .limit_requests
            .iter()
            .filter(|r| r.parent_id == parent_id && status.map_or(true, |s| r.status == s))
            .map(|r| TimeLimitRequestListing {
                request: r.clone(),
                teenager_name: FamilyStore::user_name(&inner, r.teenager_id),
            })
            .collect())
    }

    async fn get_for_parent(
        &self,
        id: TimeLimitRequestId,
        parent_id: UserId,
    ) -> anyhow::Result<Option<TimeLimitRequest>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .limit_requests
            .iter()
            .find(|r| r.id == id && r.parent_id == parent_id)
            .cloned())
    }

    async fn set_status(
        &self,
        id: TimeLimitRequestId,
        status: RequestStatus,
    ) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        if let Some(request) = inner.limit_requests.iter_mut().find(|r| r.id == id) {
            request.status = status;
            request.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_pending_for_teenager(
        &self,
        id: TimeLimitRequestId,
        teenager_id: UserId,
    ) -> anyhow::Result<u64> {
        let mut inner = self.0.inner.lock().unwrap();
        let before = inner.limit_requests.len();
        inner.limit_requests.retain(|r| {
            !(r.id == id && r.teenager_id == teenager_id && r.status == RequestStatus::Pending)
        });
        Ok((before - inner.limit_requests.len()) as u64)
    }

    async fn delete_for_parent(
        &self,
        id: TimeLimitRequestId,
        parent_id: UserId,
    ) -> anyhow::Result<u64> {
        let mut inner = self.0.inner.lock().unwrap();
        let before = inner.limit_requests.len();
        inner
            .limit_requests
            .retain(|r| !(r.id == id && r.parent_id == parent_id));
        Ok((before - inner.limit_requests.len()) as u64)
    }
}

pub struct InMemoryBlockedSiteRepo(pub Arc<FamilyStore>);

#[async_trait]
impl BlockedSiteRepository for InMemoryBlockedSiteRepo {
    async fn create_site(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        site_url: &str,
    ) -> anyhow::Result<BlockedSite> {
        let created = BlockedSite {
            id: BlockedSiteId::new(),
            parent_id,
            teenager_id,
            site_url: site_url.to_string(),
            created_at: Utc::now(),
        };
        self.0.inner.lock().unwrap().sites.push(created.clone());
        Ok(created)
    }

    async fn site_exists(
        &self,
        parent_id: UserId,
        teenager_id: UserId,
        site_url: &str,
    ) -> anyhow::Result<bool> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.sites.iter().any(|s| {
            s.parent_id == parent_id && s.teenager_id == teenager_id && s.site_url == site_url
        }))
    }

    async fn list_for_parent(
        &self,
        parent_id: UserId,
    ) -> anyhow::Result<Vec<BlockedSiteListing>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .sites
            .iter()
            .filter(|s| s.parent_id == parent_id)
            .map(|s| BlockedSiteListing {
                site: s.clone(),
                teenager_name: FamilyStore::user_name(&inner, s.teenager_id),
            })
            .collect())
    }

    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<BlockedSite>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .sites
            .iter()
            .filter(|s| s.teenager_id == teenager_id)
            .cloned()
            .collect())
    }

    async fn delete_for_parent(
        &self,
        id: BlockedSiteId,
        parent_id: UserId,
    ) -> anyhow::Result<u64> {
        let mut inner = self.0.inner.lock().unwrap();
        let before = inner.sites.len();
        inner
            .sites
            .retain(|s| !(s.id == id && s.parent_id == parent_id));
        Ok((before - inner.sites.len()) as u64)
    }
}

pub struct InMemoryCustomAppRepo(pub Arc<FamilyStore>);

#[async_trait]
impl CustomAppRepository for InMemoryCustomAppRepo {
    async fn create_app(&self, app: NewCustomApp) -> anyhow::Result<CustomApp> {
        let created = CustomApp {
            id: CustomAppId::new(),
            teenager_id: app.teenager_id,
            app_name: app.app_name,
            icon: app.icon,
            category: app.category,
            url: app.url,
            created_at: Utc::now(),
        };
        self.0
            .inner
            .lock()
            .unwrap()
            .custom_apps
            .push(created.clone());
        Ok(created)
    }

    async fn get_app(&self, id: CustomAppId) -> anyhow::Result<Option<CustomApp>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.custom_apps.iter().find(|a| a.id == id).cloned())
    }

    async fn name_taken(
        &self,
        teenager_id: UserId,
        app_name: &str,
        exclude: Option<CustomAppId>,
    ) -> anyhow::Result<bool> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.custom_apps.iter().any(|a| {
            a.teenager_id == teenager_id
                && a.app_name == app_name
                && exclude.map_or(true, |id| a.id != id)
        }))
    }

    async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<CustomApp>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .custom_apps
            .iter()
            .filter(|a| a.teenager_id == teenager_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<CustomAppListing>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .custom_apps
            .iter()
            .map(|a| CustomAppListing {
                app: a.clone(),
                teenager_name: FamilyStore::user_name(&inner, a.teenager_id),
            })
            .collect())
    }

    async fn update_app(
        &self,
        id: CustomAppId,
        update: CustomAppUpdate,
    ) -> anyhow::Result<CustomApp> {
        let mut inner = self.0.inner.lock().unwrap();
        let app = inner
            .custom_apps
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| anyhow::anyhow!("Custom app not found"))?;
        app.app_name = update.app_name;
        app.icon = update.icon;
        app.category = update.category;
        app.url = update.url;
        Ok(app.clone())
    }

    async fn delete_app(&self, id: CustomAppId) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        inner.custom_apps.retain(|a| a.id != id);
        Ok(())
    }

    async fn hidden_apps(&self, teenager_id: UserId) -> anyhow::Result<Vec<String>> {
        let inner = self.0.inner.lock().unwrap();
        let mut names: Vec<String> = inner
            .hidden
            .iter()
            .filter(|(t, _)| *t == teenager_id)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn is_hidden(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<bool> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .hidden
            .contains(&(teenager_id, app_name.to_string())))
    }

    async fn hide_app(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        inner.hidden.insert((teenager_id, app_name.to_string()));
        Ok(())
    }

    async fn unhide_app(&self, teenager_id: UserId, app_name: &str) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        inner.hidden.remove(&(teenager_id, app_name.to_string()));
        Ok(())
    }
}

/// Build a test server backed entirely by the in-memory store.
pub async fn create_test_server() -> TestServer {
    let store = Arc::new(FamilyStore::default());

    let user_repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepo(store.clone()));
    let session_repo: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepo(store.clone()));
    let usage_repo: Arc<dyn UsageRepository> = Arc::new(InMemoryUsageRepo(store.clone()));
    let report_repo: Arc<dyn ReportRepository> = Arc::new(InMemoryReportRepo(store.clone()));
    let task_repo: Arc<dyn TaskRepository> = Arc::new(InMemoryTaskRepo(store.clone()));
    let time_request_repo: Arc<dyn TimeRequestRepository> =
        Arc::new(InMemoryTimeRequestRepo(store.clone()));
    let limit_repo: Arc<dyn AppLimitRepository> = Arc::new(InMemoryAppLimitRepo(store.clone()));
    let limit_request_repo: Arc<dyn TimeLimitRequestRepository> =
        Arc::new(InMemoryTimeLimitRequestRepo(store.clone()));
    let site_repo: Arc<dyn BlockedSiteRepository> =
        Arc::new(InMemoryBlockedSiteRepo(store.clone()));
    let custom_app_repo: Arc<dyn CustomAppRepository> =
        Arc::new(InMemoryCustomAppRepo(store.clone()));

    let app_state = AppState {
        auth_service: Arc::new(AuthServiceImpl::new(
            user_repo.clone(),
            session_repo.clone(),
            7,
        )),
        usage_service: Arc::new(UsageServiceImpl::new(usage_repo)),
        report_service: Arc::new(ReportServiceImpl::new(report_repo)),
        task_service: Arc::new(TaskServiceImpl::new(task_repo.clone(), user_repo.clone())),
        time_request_service: Arc::new(TimeRequestServiceImpl::new(time_request_repo, task_repo)),
        limit_service: Arc::new(LimitServiceImpl::new(
            limit_repo,
            limit_request_repo,
            user_repo.clone(),
        )),
        blocked_site_service: Arc::new(BlockedSiteServiceImpl::new(
            site_repo,
            user_repo.clone(),
        )),
        custom_app_service: Arc::new(CustomAppServiceImpl::new(
            custom_app_repo,
            user_repo.clone(),
        )),
        session_repository: session_repo,
        user_repository: user_repo,
    };

    let cors = config::CorsConfig {
        exact_matches: vec!["http://localhost:3000".to_string()],
        wildcard_suffixes: vec![],
    };
    let app = create_router_with_cors(app_state, cors);
    TestServer::new(app).expect("Failed to create test server")
}

/// Register an account and return (token, user id).
pub async fn register_user(
    server: &TestServer,
    name: &str,
    email: &str,
    role: &str,
    parent_id: Option<String>,
) -> (String, String) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": "hunter2!",
            "role": role,
            "parent_id": parent_id,
        }))
        .await;
    assert_eq!(response.status_code(), 201, "registration should succeed");
    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().expect("token").to_string();
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();
    (token, user_id)
}

pub async fn register_parent(server: &TestServer, email: &str) -> (String, String) {
    register_user(server, "Pat Parent", email, "parent", None).await
}

pub async fn register_teen(
    server: &TestServer,
    email: &str,
    parent_id: &str,
) -> (String, String) {
    register_user(
        server,
        "Taylor Teen",
        email,
        "teenager",
        Some(parent_id.to_string()),
    )
    .await
}

pub fn bearer(token: &str) -> (http::HeaderName, http::HeaderValue) {
    (
        http::HeaderName::from_static("authorization"),
        http::HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}
