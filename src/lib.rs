pub mod cli;
pub mod commands;
pub mod config;

pub use todo_sync_core as core;
pub use todo_sync_core::model;
pub use todo_sync_core::AppConfig;

pub use todo_sync_session as session;
