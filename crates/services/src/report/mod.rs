pub mod ports;
pub mod service;

pub use ports::{ParentReport, ReportRepository, ReportService, TaskStats, TeenReport};
pub use service::ReportServiceImpl;
