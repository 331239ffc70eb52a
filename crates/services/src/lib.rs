pub mod apps;
pub mod auth;
pub mod clock;
pub mod error;
pub mod limits;
pub mod report;
pub mod sites;
pub mod tasks;
pub mod time_requests;
pub mod types;
pub mod usage;

pub use error::{ServiceError, ServiceResult};
pub use types::{
    AppLimitId, BlockedSiteId, CustomAppId, RequestStatus, SessionId, TaskId, TimeLimitRequestId,
    TimeRequestId, UserId,
};
