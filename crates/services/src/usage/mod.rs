pub mod ports;
pub mod service;

pub use ports::{DateWindow, UsageRepository, UsageRow, UsageService};
pub use service::{UsageServiceImpl, MIN_APP_NAME_LEN};
