pub mod catalog;
pub mod ports;
pub mod service;

pub use catalog::{predefined_apps, PredefinedApp};
pub use ports::{
    AppLimit, AppLimitListing, AppLimitRepository, LimitService, LimitWrite, NewTimeLimitRequest,
    StatusFilter, TimeLimitRequest, TimeLimitRequestListing, TimeLimitRequestRepository,
};
pub use service::LimitServiceImpl;
