//! Collects lightweight session telemetry so sync behavior can be inspected while debugging.

#[cfg(feature = "telemetry")]
use std::collections::VecDeque;

#[cfg(feature = "telemetry")]
use parking_lot::Mutex;
use todo_sync_core::notifications::NotificationFlag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoadRequested,
    LoadCompleted { count: usize },
    LoadFailed { error: String },
    CreateStarted,
    CreateFinished(u64),
    CreateFailed { error: String },
    DeleteStarted { id: u64, action: &'static str },
    DeleteApplied { id: u64, action: &'static str },
    DeleteFailed { id: u64, action: &'static str, error: String },
    NotificationRaised(NotificationFlag),
    NotificationExpired(NotificationFlag),
}

/// Most recent events kept in memory; older ones only survive in the tracing output.
#[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
pub const RETAINED_EVENTS: usize = 256;

pub struct Handle {
    #[cfg(feature = "telemetry")]
    events: Mutex<VecDeque<Event>>,
}

impl Handle {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "telemetry")]
            events: Mutex::new(VecDeque::with_capacity(RETAINED_EVENTS)),
        }
    }

    pub fn record(&self, event: Event) {
        #[cfg(feature = "telemetry")]
        {
            match &event {
                Event::LoadRequested => tracing::debug!("session telemetry load requested"),
                Event::LoadCompleted { count } => {
                    tracing::debug!(count, "session telemetry load completed")
                }
                Event::LoadFailed { error } => {
                    tracing::debug!(error = %error, "session telemetry load failed")
                }
                Event::CreateStarted => tracing::debug!("session telemetry create started"),
                Event::CreateFinished(id) => {
                    tracing::debug!(task_id = id, "session telemetry create finished")
                }
                Event::CreateFailed { error } => {
                    tracing::debug!(error = %error, "session telemetry create failed")
                }
                Event::DeleteStarted { id, action } => {
                    tracing::debug!(task_id = id, action, "session telemetry delete started")
                }
                Event::DeleteApplied { id, action } => {
                    tracing::debug!(task_id = id, action, "session telemetry delete applied")
                }
                Event::DeleteFailed { id, action, error } => tracing::debug!(
                    task_id = id,
                    action,
                    error = %error,
                    "session telemetry delete failed"
                ),
                Event::NotificationRaised(flag) => tracing::debug!(
                    flag = flag.as_str(),
                    "session telemetry notification raised"
                ),
                Event::NotificationExpired(flag) => tracing::debug!(
                    flag = flag.as_str(),
                    "session telemetry notification expired"
                ),
            }
            let mut events = self.events.lock();
            if events.len() == RETAINED_EVENTS {
                events.pop_front();
            }
            events.push_back(event);
        }
        #[cfg(not(feature = "telemetry"))]
        {
            let _ = event;
        }
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        cfg!(feature = "telemetry")
    }

    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<Event> {
        #[cfg(feature = "telemetry")]
        {
            self.events.lock().iter().cloned().collect()
        }
        #[cfg(not(feature = "telemetry"))]
        {
            Vec::new()
        }
    }
}
