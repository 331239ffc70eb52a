use async_trait::async_trait;
use std::sync::Arc;

use super::ports::{
    AppLimitListing, AppLimitRepository, LimitService, LimitWrite, NewTimeLimitRequest,
    StatusFilter, TimeLimitRequest, TimeLimitRequestListing, TimeLimitRequestRepository,
};
use crate::auth::ports::{Caller, Role, UserRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::types::{AppLimitId, RequestStatus, TimeLimitRequestId, UserId};
use crate::usage::MIN_APP_NAME_LEN;

pub struct LimitServiceImpl {
    limit_repository: Arc<dyn AppLimitRepository>,
    request_repository: Arc<dyn TimeLimitRequestRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl LimitServiceImpl {
    pub fn new(
        limit_repository: Arc<dyn AppLimitRepository>,
        request_repository: Arc<dyn TimeLimitRequestRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            limit_repository,
            request_repository,
            user_repository,
        }
    }

    async fn teenager_parent(&self, teenager_id: UserId) -> ServiceResult<UserId> {
        let teen = self
            .user_repository
            .get_user(teenager_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;
        teen.parent_id
            .ok_or_else(|| ServiceError::validation("No parent associated with this account"))
    }
}

#[async_trait]
impl LimitService for LimitServiceImpl {
    async fn list_limits(&self, caller: Caller) -> ServiceResult<Vec<AppLimitListing>> {
        match caller.role {
            Role::Parent => Ok(self.limit_repository.list_for_parent(caller.user_id).await?),
            Role::Teenager => {
                let limits = self
                    .limit_repository
                    .list_for_teenager(caller.user_id)
                    .await?;
                Ok(limits
                    .into_iter()
                    .map(|limit| AppLimitListing {
                        limit,
                        teenager_name: None,
                    })
                    .collect())
            }
        }
    }

    async fn set_limit(
        &self,
        caller: Caller,
        teenager_id: UserId,
        app_name: &str,
        daily_limit_minutes: i32,
    ) -> ServiceResult<LimitWrite> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization("Only parents can set limits"));
        }
        let app_name = app_name.trim();
        if app_name.len() < MIN_APP_NAME_LEN {
            return Err(ServiceError::validation(
                "App name must be at least 2 characters",
            ));
        }
        if daily_limit_minutes <= 0 {
            return Err(ServiceError::validation(
                "Daily limit must be a positive number of minutes",
            ));
        }

        let teen = self
            .user_repository
            .get_user_with_role(teenager_id, Role::Teenager)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teenager not found"))?;
        if teen.parent_id != Some(caller.user_id) {
            return Err(ServiceError::authorization(
                "You can only set limits for your own teenagers",
            ));
        }

        let written = self
            .limit_repository
            .upsert_limit(caller.user_id, teenager_id, app_name, daily_limit_minutes)
            .await?;
        tracing::info!(
            "Parent {} set {}-minute limit on {} for teen {}",
            caller.user_id,
            daily_limit_minutes,
            app_name,
            teenager_id
        );
        Ok(written)
    }

    async fn delete_limit(&self, caller: Caller, id: AppLimitId) -> ServiceResult<()> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization("Only parents can delete limits"));
        }
        let limit = self
            .limit_repository
            .get_for_parent(id, caller.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Limit not found"))?;
        self.limit_repository.delete_limit(limit.id).await?;
        Ok(())
    }

    async fn create_limit_request(
        &self,
        caller: Caller,
        app_name: &str,
        requested_limit: i32,
        reason: Option<String>,
    ) -> ServiceResult<TimeLimitRequest> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization(
                "Only teenagers can request limit changes",
            ));
        }
        let app_name = app_name.trim();
        if app_name.len() < MIN_APP_NAME_LEN {
            return Err(ServiceError::validation(
                "App name must be at least 2 characters",
            ));
        }
        if requested_limit <= 0 {
            return Err(ServiceError::validation(
                "Requested limit must be a positive number of minutes",
            ));
        }

        let parent_id = self.teenager_parent(caller.user_id).await?;

        if self
            .request_repository
            .pending_exists(caller.user_id, app_name)
            .await?
        {
            return Err(ServiceError::conflict(
                "A pending request already exists for this app",
            ));
        }

        let current_limit = self
            .limit_repository
            .get_limit(caller.user_id, app_name)
            .await?
            .map(|l| l.daily_limit_minutes)
            .unwrap_or(0);

        let request = self
            .request_repository
            .create_request(NewTimeLimitRequest {
                teenager_id: caller.user_id,
                parent_id,
                app_name: app_name.to_string(),
                current_limit,
                requested_limit,
                reason,
            })
            .await?;

        tracing::info!(
            "Teen {} requested a {}-minute limit on {}",
            caller.user_id,
            requested_limit,
            app_name
        );
        Ok(request)
    }

    async fn my_limit_requests(&self, caller: Caller) -> ServiceResult<Vec<TimeLimitRequest>> {
        if caller.role != Role::Teenager {
            return Err(ServiceError::authorization("Teenager account required"));
        }
        Ok(self
            .request_repository
            .list_for_teenager(caller.user_id)
            .await?)
    }

    async fn parent_limit_requests(
        &self,
        caller: Caller,
        filter: StatusFilter,
    ) -> ServiceResult<Vec<TimeLimitRequestListing>> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization("Parent account required"));
        }
        Ok(self
            .request_repository
            .list_for_parent(caller.user_id, filter.as_status())
            .await?)
    }

    async fn decide_limit_request(
        &self,
        caller: Caller,
        id: TimeLimitRequestId,
        decision: RequestStatus,
    ) -> ServiceResult<()> {
        if caller.role != Role::Parent {
            return Err(ServiceError::authorization(
                "Only parents can approve or reject requests",
            ));
        }
        if !decision.is_terminal() {
            return Err(ServiceError::validation(
                "Status must be either approved or rejected",
            ));
        }

        let request = self
            .request_repository
            .get_for_parent(id, caller.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Request not found"))?;
        if request.status != RequestStatus::Pending {
            return Err(ServiceError::conflict(
                "This request has already been processed",
            ));
        }

        self.request_repository.set_status(id, decision).await?;

        if decision == RequestStatus::Approved {
            self.limit_repository
                .upsert_limit(
                    caller.user_id,
                    request.teenager_id,
                    &request.app_name,
                    request.requested_limit,
                )
                .await?;
            tracing::info!(
                "Approved limit request {}: {} now capped at {} minutes",
                id,
                request.app_name,
                request.requested_limit
            );
        }

        Ok(())
    }

    async fn delete_limit_request(
        &self,
        caller: Caller,
        id: TimeLimitRequestId,
    ) -> ServiceResult<()> {
        let removed = match caller.role {
            // Teens may only withdraw requests that are still pending.
            Role::Teenager => {
                self.request_repository
                    .delete_pending_for_teenager(id, caller.user_id)
                    .await?
            }
            Role::Parent => {
                self.request_repository
                    .delete_for_parent(id, caller.user_id)
                    .await?
            }
        };
        if removed == 0 {
            return Err(ServiceError::not_found("Request not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ports::{AccountListing, NewUser, User};
    use crate::limits::ports::AppLimit;
    use chrono::Utc;
    use std::sync::Mutex;

    struct MockUserRepo {
        users: Mutex<Vec<User>>,
    }

    impl MockUserRepo {
        fn with_users(users: Vec<User>) -> Self {
            Self {
                users: Mutex::new(users),
            }
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepo {
        async fn create_user(&self, _: NewUser) -> anyhow::Result<User> {
            unimplemented!()
        }

        async fn get_user(&self, user_id: UserId) -> anyhow::Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned())
        }

        async fn get_user_by_email(&self, _: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }

        async fn list_parents(&self) -> anyhow::Result<Vec<AccountListing>> {
            Ok(Vec::new())
        }

        async fn list_teenagers(&self) -> anyhow::Result<Vec<AccountListing>> {
            Ok(Vec::new())
        }

        async fn get_user_with_role(
            &self,
            user_id: UserId,
            role: Role,
        ) -> anyhow::Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id && u.role == role)
                .cloned())
        }
    }

    struct MockLimitRepo {
        limits: Mutex<Vec<AppLimit>>,
    }

    impl MockLimitRepo {
        fn new() -> Self {
            Self {
                limits: Mutex::new(Vec::new()),
            }
        }

        fn with_limit(limit: AppLimit) -> Self {
            Self {
                limits: Mutex::new(vec![limit]),
            }
        }
    }

    #[async_trait]
    impl AppLimitRepository for MockLimitRepo {
        async fn list_for_parent(&self, parent_id: UserId) -> anyhow::Result<Vec<AppLimitListing>> {
            Ok(self
                .limits
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.parent_id == parent_id)
                .cloned()
                .map(|limit| AppLimitListing {
                    limit,
                    teenager_name: None,
                })
                .collect())
        }

        async fn list_for_teenager(&self, teenager_id: UserId) -> anyhow::Result<Vec<AppLimit>> {
            Ok(self
                .limits
                .lock()
                .unwrap()
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
            Ok(self
                .limits
                .lock()
                .unwrap()
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
            let mut limits = self.limits.lock().unwrap();
            if let Some(existing) = limits
                .iter_mut()
                .find(|l| l.teenager_id == teenager_id && l.app_name == app_name)
            {
                existing.daily_limit_minutes = daily_limit_minutes;
                return Ok(LimitWrite::Updated);
            }
            limits.push(AppLimit {
                id: AppLimitId::new(),
                parent_id,
                teenager_id,
                app_name: app_name.to_string(),
                daily_limit_minutes,
                created_at: Utc::now(),
            });
            Ok(LimitWrite::Created)
        }

        async fn get_for_parent(
            &self,
            id: AppLimitId,
            parent_id: UserId,
        ) -> anyhow::Result<Option<AppLimit>> {
            Ok(self
                .limits
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.id == id && l.parent_id == parent_id)
                .cloned())
        }

        async fn delete_limit(&self, id: AppLimitId) -> anyhow::Result<()> {
            self.limits.lock().unwrap().retain(|l| l.id != id);
            Ok(())
        }
    }

    struct MockRequestRepo {
        requests: Mutex<Vec<TimeLimitRequest>>,
    }

    impl MockRequestRepo {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }

        fn with_request(request: TimeLimitRequest) -> Self {
            Self {
                requests: Mutex::new(vec![request]),
            }
        }
    }

    #[async_trait]
    impl TimeLimitRequestRepository for MockRequestRepo {
        async fn create_request(
            &self,
            new: NewTimeLimitRequest,
        ) -> anyhow::Result<TimeLimitRequest> {
            let request = TimeLimitRequest {
                id: TimeLimitRequestId::new(),
                teenager_id: new.teenager_id,
                parent_id: new.parent_id,
                app_name: new.app_name,
                current_limit: new.current_limit,
                requested_limit: new.requested_limit,
                reason: new.reason,
                status: RequestStatus::Pending,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.requests.lock().unwrap().push(request.clone());
            Ok(request)
        }

        async fn pending_exists(
            &self,
            teenager_id: UserId,
            app_name: &str,
        ) -> anyhow::Result<bool> {
            Ok(self.requests.lock().unwrap().iter().any(|r| {
                r.teenager_id == teenager_id
                    && r.app_name == app_name
                    && r.status == RequestStatus::Pending
            }))
        }

        async fn list_for_teenager(
            &self,
            teenager_id: UserId,
        ) -> anyhow::Result<Vec<TimeLimitRequest>> {
            Ok(self
                .requests
                .lock()
                .unwrap()
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
            Ok(self
                .requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.parent_id == parent_id && status.map_or(true, |s| r.status == s))
                .cloned()
                .map(|request| TimeLimitRequestListing {
                    request,
                    teenager_name: None,
                })
                .collect())
        }

        async fn get_for_parent(
            &self,
            id: TimeLimitRequestId,
            parent_id: UserId,
        ) -> anyhow::Result<Option<TimeLimitRequest>> {
            Ok(self
                .requests
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id && r.parent_id == parent_id)
                .cloned())
        }

        async fn set_status(
            &self,
            id: TimeLimitRequestId,
            status: RequestStatus,
        ) -> anyhow::Result<()> {
            for r in self.requests.lock().unwrap().iter_mut() {
                if r.id == id {
                    r.status = status;
                }
            }
            Ok(())
        }

        async fn delete_pending_for_teenager(
            &self,
            id: TimeLimitRequestId,
            teenager_id: UserId,
        ) -> anyhow::Result<u64> {
            let mut requests = self.requests.lock().unwrap();
            let before = requests.len();
            requests.retain(|r| {
                !(r.id == id
                    && r.teenager_id == teenager_id
                    && r.status == RequestStatus::Pending)
            });
            Ok((before - requests.len()) as u64)
        }

        async fn delete_for_parent(
            &self,
            id: TimeLimitRequestId,
            parent_id: UserId,
        ) -> anyhow::Result<u64> {
            let mut requests = self.requests.lock().unwrap();
            let before = requests.len();
            requests.retain(|r| !(r.id == id && r.parent_id == parent_id));
            Ok((before - requests.len()) as u64)
        }
    }

    fn family() -> (User, User) {
        let parent = User {
            id: UserId::new(),
            name: "Pat".to_string(),
            email: "pat@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Parent,
            parent_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let teen = User {
            id: UserId::new(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Teenager,
            parent_id: Some(parent.id),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        (parent, teen)
    }

    fn service(
        limits: MockLimitRepo,
        requests: MockRequestRepo,
        users: Vec<User>,
    ) -> LimitServiceImpl {
        LimitServiceImpl::new(
            Arc::new(limits),
            Arc::new(requests),
            Arc::new(MockUserRepo::with_users(users)),
        )
    }

    #[tokio::test]
    async fn set_limit_creates_then_updates() {
        let (parent, teen) = family();
        let svc = service(
            MockLimitRepo::new(),
            MockRequestRepo::new(),
            vec![parent.clone(), teen.clone()],
        );

        let first = svc
            .set_limit(Caller::parent(parent.id), teen.id, "YouTube", 60)
            .await
            .unwrap();
        assert_eq!(first, LimitWrite::Created);

        let second = svc
            .set_limit(Caller::parent(parent.id), teen.id, "YouTube", 45)
            .await
            .unwrap();
        assert_eq!(second, LimitWrite::Updated);
    }

    #[tokio::test]
    async fn cannot_set_limit_for_another_familys_teen() {
        let (parent, teen) = family();
        let svc = service(
            MockLimitRepo::new(),
            MockRequestRepo::new(),
            vec![parent, teen.clone()],
        );

        let err = svc
            .set_limit(Caller::parent(UserId::new()), teen.id, "YouTube", 60)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Authorization(_)));
    }

    #[tokio::test]
    async fn request_snapshots_current_limit_zero_when_unset() {
        let (parent, teen) = family();
        let svc = service(
            MockLimitRepo::new(),
            MockRequestRepo::new(),
            vec![parent, teen.clone()],
        );

        let request = svc
            .create_limit_request(Caller::teenager(teen.id), "TikTok", 90, None)
            .await
            .unwrap();
        assert_eq!(request.current_limit, 0);
        assert_eq!(request.requested_limit, 90);
    }

    #[tokio::test]
    async fn second_pending_request_for_app_conflicts() {
        let (parent, teen) = family();
        let svc = service(
            MockLimitRepo::new(),
            MockRequestRepo::new(),
            vec![parent, teen.clone()],
        );

        svc.create_limit_request(Caller::teenager(teen.id), "TikTok", 90, None)
            .await
            .unwrap();
        let err = svc
            .create_limit_request(Caller::teenager(teen.id), "TikTok", 120, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn teen_without_parent_cannot_request() {
        let (_, mut teen) = family();
        teen.parent_id = None;
        let svc = service(
            MockLimitRepo::new(),
            MockRequestRepo::new(),
            vec![teen.clone()],
        );

        let err = svc
            .create_limit_request(Caller::teenager(teen.id), "TikTok", 90, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn approval_writes_the_requested_limit() {
        let (parent, teen) = family();
        let limits = Arc::new(MockLimitRepo::new());
        let svc = LimitServiceImpl::new(
            limits.clone(),
            Arc::new(MockRequestRepo::with_request(TimeLimitRequest {
                id: TimeLimitRequestId::new(),
                teenager_id: teen.id,
                parent_id: parent.id,
                app_name: "TikTok".to_string(),
                current_limit: 0,
                requested_limit: 90,
                reason: None,
                status: RequestStatus::Pending,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })),
            Arc::new(MockUserRepo::with_users(vec![
                parent.clone(),
                teen.clone(),
            ])),
        );

        let requests = svc.my_limit_requests(Caller::teenager(teen.id)).await.unwrap();
        let request_id = requests[0].id;

        svc.decide_limit_request(Caller::parent(parent.id), request_id, RequestStatus::Approved)
            .await
            .unwrap();

        let written = limits.get_limit(teen.id, "TikTok").await.unwrap().unwrap();
        assert_eq!(written.daily_limit_minutes, 90);
        assert_eq!(
            limits.list_for_teenager(teen.id).await.unwrap().len(),
            1
        );

        // The request is terminal now; a second decision conflicts.
        let err = svc
            .decide_limit_request(Caller::parent(parent.id), request_id, RequestStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn rejection_does_not_touch_limits() {
        let (parent, teen) = family();
        let limits = Arc::new(MockLimitRepo::new());
        let svc = LimitServiceImpl::new(
            limits.clone(),
            Arc::new(MockRequestRepo::with_request(TimeLimitRequest {
                id: TimeLimitRequestId::new(),
                teenager_id: teen.id,
                parent_id: parent.id,
                app_name: "TikTok".to_string(),
                current_limit: 0,
                requested_limit: 90,
                reason: None,
                status: RequestStatus::Pending,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })),
            Arc::new(MockUserRepo::with_users(vec![
                parent.clone(),
                teen.clone(),
            ])),
        );

        let request_id = svc.my_limit_requests(Caller::teenager(teen.id)).await.unwrap()[0].id;
        svc.decide_limit_request(Caller::parent(parent.id), request_id, RequestStatus::Rejected)
            .await
            .unwrap();

        assert!(limits.get_limit(teen.id, "TikTok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn teen_can_only_withdraw_pending_requests() {
        let (parent, teen) = family();
        let request = TimeLimitRequest {
            id: TimeLimitRequestId::new(),
            teenager_id: teen.id,
            parent_id: parent.id,
            app_name: "TikTok".to_string(),
            current_limit: 0,
            requested_limit: 90,
            reason: None,
            status: RequestStatus::Approved,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let request_id = request.id;

        let svc = service(
            MockLimitRepo::new(),
            MockRequestRepo::with_request(request),
            vec![parent.clone(), teen.clone()],
        );

        let err = svc
            .delete_limit_request(Caller::teenager(teen.id), request_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // The parent can still remove it.
        svc.delete_limit_request(Caller::parent(parent.id), request_id)
            .await
            .unwrap();
    }
}
