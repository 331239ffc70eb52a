pub mod ports;
pub mod service;

pub use ports::{AuthService, Caller, Role, SessionRepository, User, UserRepository};
pub use service::AuthServiceImpl;
