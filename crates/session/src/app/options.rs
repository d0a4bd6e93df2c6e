//! Configuration surfaces for tailoring a session to one owner and service.

use std::time::Duration;

use todo_sync_core::AppConfig;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub owner_id: u64,
    pub notification_ttl: Duration,
    /// When a single delete fails, also unlock input and drop the in-progress marker.
    /// Off by default: a failed delete leaves both untouched.
    pub release_lock_on_delete_failure: bool,
}

impl SessionOptions {
    pub fn new(owner_id: u64) -> Self {
        Self {
            owner_id,
            notification_ttl: Duration::from_secs(3),
            release_lock_on_delete_failure: false,
        }
    }
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            owner_id: config.owner_id(),
            notification_ttl: config.notification_ttl(),
            release_lock_on_delete_failure: config.release_lock_on_delete_failure(),
        }
    }
}
