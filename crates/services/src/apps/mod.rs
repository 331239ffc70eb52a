pub mod ports;
pub mod service;

pub use ports::{
    CustomApp, CustomAppListing, CustomAppRepository, CustomAppService, CustomAppUpdate,
    NewCustomApp, DEFAULT_APP_CATEGORY, DEFAULT_APP_ICON,
};
pub use service::CustomAppServiceImpl;
