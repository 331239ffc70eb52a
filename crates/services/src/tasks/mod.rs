pub mod ports;
pub mod service;

pub use ports::{Task, TaskRepository, TaskService, TaskStatus};
pub use service::TaskServiceImpl;
