pub mod ports;
pub mod service;

pub use ports::{TimeRequest, TimeRequestRepository, TimeRequestService};
pub use service::TimeRequestServiceImpl;
