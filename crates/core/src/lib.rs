pub mod capture;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod notifications;
pub mod view;

pub use capture::{prepare_new_task, TitleError};
pub use client::{HttpTaskService, TaskService};
pub use config::{AppConfig, ConfigOverrides};
pub use error::ServiceError;
pub use model::*;
pub use notifications::{ExpiryTicket, NotificationBanner, NotificationFlag, Notifications};
pub use view::{TaskCounts, TaskView};
