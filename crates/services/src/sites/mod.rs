pub mod ports;
pub mod service;

pub use ports::{BlockedSite, BlockedSiteListing, BlockedSiteRepository, BlockedSiteService};
pub use service::BlockedSiteServiceImpl;
